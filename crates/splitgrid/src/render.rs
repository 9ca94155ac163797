//! Buffer drawing for a single grid.
//!
//! The header is a fixed top line (a terminal grid's header never scrolls
//! away, which is the frozen-header presentation). The body draws the
//! materialized surface rows at their dataset position minus the scroll
//! offset, so full and virtual rendering share one code path.

use crate::grid::SingleGrid;
use crate::sort::{SortDirection, SortRule};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;

#[derive(Clone, Copy, Debug)]
pub struct GridStyles {
    pub base: Style,
    pub header: Style,
    pub grid_line: Style,
    pub scrollbar: Style,
    /// Row marked active by click or `set_active_row`.
    pub active: Style,
    /// Row pinned by double-click or `set_locked_row`.
    pub locked: Style,
    pub hover: Style,
    /// Cells flagged by an incremental update (`flash_when_update`).
    pub changed: Style,
    /// Sort indicator of the column currently sorted.
    pub sort_on: Style,
    /// Sort indicator of sortable but unsorted columns.
    pub sort_off: Style,
}

impl Default for GridStyles {
    fn default() -> Self {
        Self {
            base: Style::default(),
            header: Style::default().add_modifier(Modifier::BOLD),
            grid_line: Style::default().add_modifier(Modifier::DIM),
            scrollbar: Style::default(),
            active: Style::default().add_modifier(Modifier::REVERSED),
            locked: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            hover: Style::default().add_modifier(Modifier::ITALIC),
            changed: Style::default().add_modifier(Modifier::RAPID_BLINK),
            sort_on: Style::default().add_modifier(Modifier::BOLD),
            sort_off: Style::default().add_modifier(Modifier::DIM),
        }
    }
}

/// Draw `grid` into `area`. `scroll_x` shifts the columns left by that many
/// cells (the scrollable section of a split grid scrolls horizontally; the
/// frozen section always passes 0).
pub fn render_grid(grid: &SingleGrid, area: Rect, buf: &mut Buffer, scroll_x: u16, styles: &GridStyles) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let header_h = 1u16.min(area.height);
    let state = grid.state();
    let row_height = grid.options().row_height.max(1) as u16;
    let content_h = grid.row_count() as u32 * row_height as u32;

    let (content_area, scrollbar_x) = if area.width >= 2 && content_h > 0 {
        (
            Rect::new(area.x, area.y, area.width - 1, area.height),
            Some(area.x + area.width - 1),
        )
    } else {
        (area, None)
    };

    let header_area = Rect::new(content_area.x, content_area.y, content_area.width, header_h);
    let body_area = Rect::new(
        content_area.x,
        content_area.y + header_h,
        content_area.width,
        content_area.height.saturating_sub(header_h),
    );

    buf.set_style(content_area, styles.base);
    if header_area.height > 0 {
        render_header(grid, header_area, buf, scroll_x, styles);
    }
    render_body(grid, body_area, buf, scroll_x, styles);

    if let Some(sb_x) = scrollbar_x {
        render_scrollbar(
            Rect::new(sb_x, body_area.y, 1, body_area.height),
            buf,
            state.scroll_top,
            body_area.height as u32,
            content_h,
            styles.scrollbar,
        );
    }
}

/// Column layout entry: x offset (pre-scroll) and width. Separators occupy
/// one extra cell after every column but the last.
fn column_offsets(widths: &[u16]) -> Vec<(u32, u16)> {
    let mut out = Vec::with_capacity(widths.len());
    let mut x = 0u32;
    for (i, &w) in widths.iter().enumerate() {
        out.push((x, w));
        x += w as u32;
        if i + 1 < widths.len() {
            x += 1;
        }
    }
    out
}

fn render_header(grid: &SingleGrid, area: Rect, buf: &mut Buffer, scroll_x: u16, styles: &GridStyles) {
    buf.set_style(area, styles.header);
    let widths = &grid.state().col_widths;
    let offsets = column_offsets(widths);

    for (i, col) in grid.columns().iter().enumerate() {
        let (start, width) = offsets[i];
        let Some((x, clip_left, max_cols)) = visible_span(area, scroll_x, start, width) else {
            continue;
        };

        let indicator = sort_indicator(grid, i);
        let title_cols = match indicator {
            // Reserve two cells for " ▲" at the column's right edge.
            Some(_) => max_cols.saturating_sub(2),
            None => max_cols,
        };
        render_str_clipped(x, area.y, clip_left, title_cols, buf, &col.title, styles.header);
        if let Some((glyph, on)) = indicator {
            let style = if on { styles.sort_on } else { styles.sort_off };
            let ind_x = x + max_cols.saturating_sub(1);
            buf.set_span(ind_x, area.y, &Span::styled(glyph, style), 1);
        }

        draw_separator(area, buf, scroll_x, &offsets, i, styles.grid_line);
    }
}

/// Indicator glyph for column `i`, if sortable, and whether it is the
/// active sort column.
fn sort_indicator(grid: &SingleGrid, i: usize) -> Option<(&'static str, bool)> {
    let col = grid.columns().get(i)?;
    if !matches!(col.sorter, SortRule::Default | SortRule::Custom(_)) {
        return None;
    }
    match grid.state().sort {
        Some((c, SortDirection::Ascend)) if c == i => Some(("▲", true)),
        Some((c, SortDirection::Descend)) if c == i => Some(("▼", true)),
        _ => Some(("⇅", false)),
    }
}

fn render_body(grid: &SingleGrid, area: Rect, buf: &mut Buffer, scroll_x: u16, styles: &GridStyles) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let state = grid.state();
    let row_height = grid.options().row_height.max(1) as i64;
    let widths = &state.col_widths;
    let offsets = column_offsets(widths);
    let surface = grid.surface();

    for (slot, row) in surface.rows().iter().enumerate() {
        let dataset_index = surface.offset_rows + slot;
        let y = dataset_index as i64 * row_height - state.scroll_top as i64;
        if y < 0 || y >= area.height as i64 {
            continue;
        }
        let y = area.y + y as u16;

        let is_locked = state.locked_row.as_deref() == Some(row.id.as_str());
        let is_active = state.active_row.as_deref() == Some(row.id.as_str());
        let is_hover = state.hover.map(|(r, _)| r == slot).unwrap_or(false);
        let row_style = if is_locked {
            styles.locked
        } else if is_active {
            styles.active
        } else if is_hover {
            styles.hover
        } else {
            styles.base
        };
        buf.set_style(Rect::new(area.x, y, area.width, 1), row_style);

        for (i, (start, width)) in offsets.iter().copied().enumerate() {
            let Some((x, clip_left, max_cols)) = visible_span(area, scroll_x, start, width) else {
                continue;
            };
            let changed = row.changed.get(i).copied().unwrap_or(false);
            let style = if changed {
                row_style.patch(styles.changed)
            } else {
                row_style
            };
            let text = row.cells.get(i).map(String::as_str).unwrap_or("");
            render_str_clipped(x, y, clip_left, max_cols, buf, text, style);
            draw_separator(
                Rect::new(area.x, y, area.width, 1),
                buf,
                scroll_x,
                &offsets,
                i,
                styles.grid_line,
            );
        }
    }
}

/// Clip a column's horizontal span against the area after the `scroll_x`
/// shift. Returns (screen x, cells clipped off the left, visible width).
fn visible_span(area: Rect, scroll_x: u16, start: u32, width: u16) -> Option<(u16, u32, u16)> {
    let rel = start as i64 - scroll_x as i64;
    let clip_left = (-rel).max(0) as u32;
    if clip_left as u64 >= width as u64 {
        return None;
    }
    let x = rel.max(0) as u16;
    if x >= area.width {
        return None;
    }
    let visible = (width as u32 - clip_left).min((area.width - x) as u32) as u16;
    if visible == 0 {
        return None;
    }
    Some((area.x + x, clip_left, visible))
}

/// Vertical separator after column `i` (never after the last column).
fn draw_separator(
    area: Rect,
    buf: &mut Buffer,
    scroll_x: u16,
    offsets: &[(u32, u16)],
    i: usize,
    style: Style,
) {
    if i + 1 >= offsets.len() {
        return;
    }
    let (start, width) = offsets[i];
    let sep_rel = (start + width as u32) as i64 - scroll_x as i64;
    if sep_rel < 0 || sep_rel >= area.width as i64 {
        return;
    }
    let sep_x = area.x + sep_rel as u16;
    for dy in 0..area.height {
        buf.set_span(sep_x, area.y + dy, &Span::styled("│", style), 1);
    }
}

/// Write `input` at (x, y), skipping `clip_left` display cells of the text
/// and stopping after `max_cols` cells. Wide characters that would straddle
/// either boundary are dropped whole.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    clip_left: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) {
    if max_cols == 0 {
        return;
    }
    let clip_left = clip_left as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out_cols = 0usize;
    let mut dx = 0u16;
    let mut tmp = [0u8; 4];

    for ch in input.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            continue;
        }
        if col + w <= clip_left || (col < clip_left && col + w > clip_left) {
            col += w;
            continue;
        }
        if out_cols + w > max_cols {
            return;
        }

        let s = ch.encode_utf8(&mut tmp);
        if let Some(cell) = buf.cell_mut((x + dx, y)) {
            cell.set_style(style);
            cell.set_symbol(s);
        }
        dx += 1;
        out_cols += 1;
        col += w;

        if w == 2 {
            if out_cols >= max_cols {
                return;
            }
            if let Some(cell) = buf.cell_mut((x + dx, y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
            dx += 1;
            out_cols += 1;
        }
    }
}

/// One-cell-wide vertical scrollbar with a proportional thumb.
pub fn render_scrollbar(
    area: Rect,
    buf: &mut Buffer,
    scroll_top: u32,
    viewport_h: u32,
    content_h: u32,
    style: Style,
) {
    buf.set_style(area, style);
    if area.height == 0 {
        return;
    }
    if content_h <= viewport_h || content_h == 0 {
        for dy in 0..area.height {
            buf.set_stringn(area.x, area.y + dy, " ", 1, style);
        }
        return;
    }

    let track_h = area.height as f64;
    let thumb_h = ((viewport_h as f64 / content_h as f64) * track_h)
        .round()
        .clamp(1.0, track_h) as u16;
    let max_top = content_h.saturating_sub(viewport_h).max(1) as f64;
    let thumb_top = ((scroll_top as f64 / max_top) * (track_h - thumb_h as f64))
        .round()
        .clamp(0.0, (track_h - thumb_h as f64).max(0.0)) as u16;

    for dy in 0..area.height {
        let ch = if dy >= thumb_top && dy < thumb_top + thumb_h {
            "█"
        } else {
            " "
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}
