use crate::model::SheetResult;
use crate::ui::app::{App, FocusPanel};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table,
    },
    Frame,
};

const BRAND_DARK: Color = Color::Rgb(0x1F, 0x2F, 0x3C);
const BRAND_SELECT_BG: Color = Color::Rgb(0xC3, 0xD3, 0xE0);
const BRAND_GREEN: Color = Color::Rgb(0x82, 0x9A, 0x68);
const BRAND_ORANGE: Color = Color::Rgb(0x9E, 0x68, 0x3C);
const BRAND_MUTED: Color = Color::Rgb(0x71, 0x65, 0x65);
const BRAND_RED: Color = Color::Rgb(0xA8, 0x3C, 0x3C);

const HEADER_STYLE: Style = Style::new().fg(BRAND_DARK).add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(BRAND_SELECT_BG)
    .fg(BRAND_DARK)
    .add_modifier(Modifier::BOLD);
const COUNT_COLOR: Color = BRAND_GREEN;
const ADVISORY_COLOR: Color = BRAND_RED;

#[must_use]
pub fn format_money(value: f64) -> String {
    format!("{value:.2} zł")
}

fn quantity_label(item: &SheetResult) -> String {
    if item.is_hardware {
        format!("{} szt.", item.sheets_needed)
    } else {
        format!("{} ark.", item.sheets_needed)
    }
}

fn row_style(is_selected: bool, is_focused: bool) -> Style {
    if is_selected && is_focused {
        SELECTED_STYLE
    } else if is_selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(BRAND_ORANGE)
    } else {
        Style::default()
    }
}

fn draw_scrollbar(frame: &mut Frame, area: Rect, len: usize, position: usize) {
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));
    let mut scrollbar_state = ScrollbarState::new(len).position(position);

    let scrollbar_area = Rect {
        x: area.x + area.width - 1,
        y: area.y + 2,
        width: 1,
        height: area.height.saturating_sub(3),
    };
    frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}

pub fn draw_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Main content
        Constraint::Length(3), // Totals
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], app);
    if let Some(error) = &app.outcome.error {
        let message = Paragraph::new(format!(" Analysis failed: {error} "))
            .style(Style::default().fg(ADVISORY_COLOR))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(message, chunks[1]);
    } else {
        draw_main_content(frame, chunks[1], app);
    }
    draw_totals(frame, chunks[2], app);
    draw_footer(
        frame,
        chunks[3],
        " ←→ Panel | ↑↓ Select | Enter Elements | +/- Markup | ]/[ Assembly | d Diagnostics | q Quit ",
    );
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let totals = app.totals();
    let title = format!(
        " Furniture Estimator | {} components | {} items | {} sheets | {} pieces ",
        app.components.len(),
        app.outcome.sheets.len(),
        totals.total_sheets,
        totals.total_pieces
    );

    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_totals(frame: &mut Frame, area: Rect, app: &App) {
    let totals = app.totals();
    let line = Line::from(vec![
        Span::raw(format!(" Materials: {} ", format_money(totals.materials))),
        Span::styled(
            format!(
                "| Markup {:.0}%: {} ",
                totals.markup_percent,
                format_money(totals.markup_amount)
            ),
            Style::default().fg(BRAND_MUTED),
        ),
        Span::styled(
            format!(
                "| Assembly {:.0}%: {} ",
                totals.assembly_percent,
                format_money(totals.assembly_amount)
            ),
            Style::default().fg(BRAND_MUTED),
        ),
        Span::styled(
            format!("| Total: {} ", format_money(totals.grand_total)),
            HEADER_STYLE,
        ),
    ]);

    let widget = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(30), // Components
        Constraint::Percentage(70), // Line items
    ])
    .split(area);

    draw_components(frame, chunks[0], app);
    draw_items(frame, chunks[1], app);
}

fn draw_components(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Components;

    let items: Vec<ListItem> = app
        .components
        .iter()
        .enumerate()
        .map(|(i, component)| {
            let is_selected = i == app.selected_component;
            let marker = if is_selected && is_focused {
                " ◄"
            } else {
                ""
            };

            let content = Line::from(vec![
                Span::styled(&component.component_id, row_style(is_selected, is_focused)),
                Span::raw(" "),
                Span::styled(
                    format!("({})", component.parts.len()),
                    Style::default().fg(COUNT_COLOR),
                ),
                Span::styled(marker, Style::default().fg(BRAND_ORANGE)),
            ]);

            ListItem::new(content)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Components ({}) ", app.components.len()))
            .borders(Borders::ALL)
            .border_style(border_style(is_focused)),
    );

    frame.render_widget(list, area);
}

fn draw_items(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Items;
    let items = app.get_component_items();

    let component_name = app
        .get_selected_component()
        .map(|c| c.component_id.clone())
        .unwrap_or_default();

    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll_offset = if app.selected_item >= visible_rows {
        app.selected_item - visible_rows + 1
    } else {
        0
    };

    let header = Row::new(vec!["SKU", "Material", "Qty", "Unit price", "Total"])
        .style(HEADER_STYLE)
        .height(1);

    let rows: Vec<Row> = items
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|(i, item)| {
            let mut style = row_style(i == app.selected_item, is_focused);
            if item.advisory.is_some() && i != app.selected_item {
                style = style.fg(ADVISORY_COLOR);
            }

            let total = match (&item.advisory, item.cost()) {
                (Some(advisory), _) => advisory.to_string(),
                (None, Some(cost)) => format_money(cost),
                (None, None) => "-".to_string(),
            };

            Row::new(vec![
                item.sku.clone(),
                item.material_name.clone().unwrap_or_else(|| "-".to_string()),
                quantity_label(item),
                item.unit_price.map_or_else(|| "-".to_string(), format_money),
                total,
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(15),
        Constraint::Percentage(35),
        Constraint::Percentage(12),
        Constraint::Percentage(14),
        Constraint::Percentage(24),
    ];

    let title = format!(" {} ({} items) ", component_name, items.len());
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(is_focused)),
    );

    frame.render_widget(table, area);

    if items.len() > visible_rows {
        draw_scrollbar(frame, area, items.len(), app.selected_item);
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, help: &str) {
    let footer = Paragraph::new(help)
        .style(Style::default().fg(BRAND_MUTED))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

pub fn draw_item_detail(frame: &mut Frame, app: &App) {
    let Some(item) = app.get_selected_item() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(3), // Header: SKU and material
        Constraint::Length(3), // Info: area | sheets | price | advisory
        Constraint::Min(6),    // Elements
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    let material = item.material_name.as_deref().unwrap_or("-");
    let header = Paragraph::new(format!(" {} | {} ", item.sku, material))
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let price = item.unit_price.map_or_else(|| "-".to_string(), format_money);
    let info_text = if item.is_hardware {
        format!("Hardware  |  {}  |  Unit price: {price}", quantity_label(item))
    } else {
        format!(
            "Area: {:.2} m²  |  {}  |  Utilization: {}%  |  Sheet price: {price}",
            item.total_area_mm2 / 1_000_000.0,
            quantity_label(item),
            item.utilization_percent()
        )
    };
    let info = match &item.advisory {
        Some(advisory) => Line::from(vec![
            Span::raw(info_text),
            Span::styled(
                format!("  |  {advisory}"),
                Style::default().fg(ADVISORY_COLOR),
            ),
        ]),
        None => Line::from(info_text),
    };
    let info_widget = Paragraph::new(info).block(Block::default().borders(Borders::ALL));
    frame.render_widget(info_widget, chunks[1]);

    let visible = (chunks[2].height as usize).saturating_sub(3);
    let rows: Vec<Row> = item
        .elements
        .iter()
        .skip(app.element_scroll_offset)
        .take(visible)
        .map(|e| {
            let size = if item.is_hardware {
                "-".to_string()
            } else {
                format!("{:.0} × {:.0}", e.width, e.height)
            };
            Row::new(vec![
                e.name.clone(),
                e.component().unwrap_or("-").to_string(),
                size,
                format!("{} szt.", e.qty),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(45),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Percentage(15),
    ];
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Element", "Component", "Size (mm)", "Qty"]).style(HEADER_STYLE))
        .block(
            Block::default()
                .title(format!(" Elements ({}) ", item.elements.len()))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, chunks[2]);

    if item.elements.len() > visible {
        draw_scrollbar(frame, chunks[2], item.elements.len(), app.element_scroll_offset);
    }

    draw_footer(frame, chunks[3], " Esc Back | ↑↓ Scroll | q Quit ");
}

pub fn draw_diagnostics(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(6),    // Diagnostics
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    let diagnostics = &app.outcome.diagnostics;
    let header = Paragraph::new(format!(
        " Diagnostics: {} changes, {} warnings ",
        diagnostics.len(),
        diagnostics.warnings().count()
    ))
    .style(HEADER_STYLE)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let visible = (chunks[1].height as usize).saturating_sub(2);
    let items: Vec<ListItem> = diagnostics
        .iter()
        .skip(app.diagnostics_scroll_offset)
        .take(visible)
        .map(|d| {
            let style = if d.is_warning() {
                Style::default().fg(BRAND_ORANGE)
            } else {
                Style::default()
            };
            ListItem::new(Span::styled(d.to_string(), style))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL));
    frame.render_widget(list, chunks[1]);

    if diagnostics.len() > visible {
        draw_scrollbar(
            frame,
            chunks[1],
            diagnostics.len(),
            app.diagnostics_scroll_offset,
        );
    }

    draw_footer(frame, chunks[2], " Esc Back | ↑↓ Scroll | q Quit ");
}
