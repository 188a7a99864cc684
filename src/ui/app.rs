use crate::model::component::group_by_component;
use crate::model::{AnalysisOutcome, ComponentGroup, EstimateTotals, SheetResult};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};

/// Step for the `+`/`-` and `]`/`[` keys, in percent.
const PERCENT_STEP: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Dashboard,
    ItemDetail,
    Diagnostics,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPanel {
    Components,
    Items,
}

pub struct App {
    pub outcome: AnalysisOutcome,
    pub components: Vec<ComponentGroup>,
    pub view: View,
    pub focus_panel: FocusPanel,
    pub selected_component: usize,
    pub selected_item: usize,
    pub element_scroll_offset: usize,
    pub diagnostics_scroll_offset: usize,
    pub markup_percent: f64,
    pub assembly_percent: f64,
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(outcome: AnalysisOutcome) -> Self {
        let components = group_by_component(&outcome.sheets);
        Self {
            outcome,
            components,
            view: View::Dashboard,
            focus_panel: FocusPanel::Components,
            selected_component: 0,
            selected_item: 0,
            element_scroll_offset: 0,
            diagnostics_scroll_offset: 0,
            markup_percent: 0.0,
            assembly_percent: 0.0,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn with_rates(mut self, markup_percent: f64, assembly_percent: f64) -> Self {
        self.markup_percent = markup_percent.max(0.0);
        self.assembly_percent = assembly_percent.max(0.0);
        self
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => super::dashboard::draw_dashboard(frame, self),
            View::ItemDetail => super::dashboard::draw_item_detail(frame, self),
            View::Diagnostics => super::dashboard::draw_diagnostics(frame, self),
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
            self.handle_key(key.code);
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match self.view {
            View::Dashboard => self.handle_dashboard_keys(code),
            View::ItemDetail => self.handle_detail_keys(code),
            View::Diagnostics => self.handle_diagnostics_keys(code),
        }
    }

    fn handle_dashboard_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.navigate_down(),
            KeyCode::Left | KeyCode::Char('h') => self.focus_panel = FocusPanel::Components,
            KeyCode::Right | KeyCode::Char('l') => self.focus_panel = FocusPanel::Items,
            KeyCode::Enter => self.enter_item_detail(),
            KeyCode::Char('d') => {
                self.view = View::Diagnostics;
                self.diagnostics_scroll_offset = 0;
            }
            KeyCode::Char('+' | '=') => self.adjust_markup(PERCENT_STEP),
            KeyCode::Char('-') => self.adjust_markup(-PERCENT_STEP),
            KeyCode::Char(']') => self.adjust_assembly(PERCENT_STEP),
            KeyCode::Char('[') => self.adjust_assembly(-PERCENT_STEP),
            _ => {}
        }
    }

    fn handle_detail_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Enter => {
                self.view = View::Dashboard;
                self.element_scroll_offset = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.element_scroll_offset = self.element_scroll_offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let count = self.get_selected_item().map_or(0, |i| i.elements.len());
                if self.element_scroll_offset < count.saturating_sub(1) {
                    self.element_scroll_offset += 1;
                }
            }
            _ => {}
        }
    }

    fn handle_diagnostics_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('d') => {
                self.view = View::Dashboard;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.diagnostics_scroll_offset = self.diagnostics_scroll_offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.diagnostics_scroll_offset < self.outcome.diagnostics.len().saturating_sub(1)
                {
                    self.diagnostics_scroll_offset += 1;
                }
            }
            _ => {}
        }
    }

    fn navigate_up(&mut self) {
        match self.focus_panel {
            FocusPanel::Components => {
                if self.selected_component > 0 {
                    self.selected_component -= 1;
                    self.selected_item = 0;
                }
            }
            FocusPanel::Items => self.selected_item = self.selected_item.saturating_sub(1),
        }
    }

    fn navigate_down(&mut self) {
        match self.focus_panel {
            FocusPanel::Components => {
                if self.selected_component < self.components.len().saturating_sub(1) {
                    self.selected_component += 1;
                    self.selected_item = 0;
                }
            }
            FocusPanel::Items => {
                if self.selected_item < self.get_component_items().len().saturating_sub(1) {
                    self.selected_item += 1;
                }
            }
        }
    }

    fn enter_item_detail(&mut self) {
        if self.focus_panel == FocusPanel::Items && self.get_selected_item().is_some() {
            self.view = View::ItemDetail;
            self.element_scroll_offset = 0;
        }
    }

    fn adjust_markup(&mut self, delta: f64) {
        self.markup_percent = (self.markup_percent + delta).max(0.0);
    }

    fn adjust_assembly(&mut self, delta: f64) {
        self.assembly_percent = (self.assembly_percent + delta).max(0.0);
    }

    #[must_use]
    pub fn get_selected_component(&self) -> Option<&ComponentGroup> {
        self.components.get(self.selected_component)
    }

    /// Line items contributing to the selected component.
    #[must_use]
    pub fn get_component_items(&self) -> Vec<&SheetResult> {
        self.get_selected_component().map_or_else(Vec::new, |c| {
            c.item_indices
                .iter()
                .filter_map(|&i| self.outcome.sheets.get(i))
                .collect()
        })
    }

    #[must_use]
    pub fn get_selected_item(&self) -> Option<&SheetResult> {
        self.get_component_items().get(self.selected_item).copied()
    }

    #[must_use]
    pub fn totals(&self) -> EstimateTotals {
        EstimateTotals::compute(
            &self.outcome.sheets,
            self.markup_percent,
            self.assembly_percent,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Diagnostics, LineElement};
    use pretty_assertions::assert_eq;

    fn outcome() -> AnalysisOutcome {
        let mut board = SheetResult::sheet(
            "W980",
            vec![
                LineElement::new("Bok - D60", 510.0, 720.0, 2, Some("D60")),
                LineElement::new("Bok - G40", 300.0, 720.0, 2, Some("G40")),
            ],
        );
        board.unit_price = Some(200.0);
        let mut hinge = SheetResult::hardware(
            "71B3590",
            "Zawias - D60",
            vec![LineElement::new("Zawias - D60", 0.0, 0.0, 2, Some("D60"))],
        );
        hinge.unit_price = Some(10.0);
        AnalysisOutcome::succeeded(vec![board, hinge], Diagnostics::new())
    }

    #[test]
    fn test_navigation_and_detail() {
        let mut app = App::new(outcome());
        assert_eq!(app.components.len(), 2);
        assert_eq!(app.get_component_items().len(), 2);

        app.handle_key(KeyCode::Enter);
        assert_eq!(app.view, View::Dashboard);

        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.get_selected_item().map(|i| i.sku.as_str()), Some("71B3590"));

        app.handle_key(KeyCode::Enter);
        assert_eq!(app.view, View::ItemDetail);
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.view, View::Dashboard);

        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Down);
        assert_eq!(
            app.get_selected_component().map(|c| c.component_id.as_str()),
            Some("G40")
        );
        assert_eq!(app.selected_item, 0);
    }

    #[test]
    fn test_rate_keys_update_totals() {
        let mut app = App::new(outcome()).with_rates(10.0, 0.0);
        app.handle_key(KeyCode::Char('+'));
        app.handle_key(KeyCode::Char(']'));
        app.handle_key(KeyCode::Char('['));
        app.handle_key(KeyCode::Char('['));

        assert_eq!(app.markup_percent, 15.0);
        assert_eq!(app.assembly_percent, 0.0);
        assert_eq!(app.totals().materials, 220.0);
        assert_eq!(app.totals().grand_total, 253.0);

        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
