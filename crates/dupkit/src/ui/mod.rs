//! The interactive TUI: per-tool state, backend wiring, and rendering.

pub mod rows;
pub mod select;
pub mod types;
pub mod viewport;

pub use types::{ScanProgress, ToolState, View};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row as TableRow, Table, Wrap},
    Frame, Terminal,
};
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::backend::{BackendEvent, BackendHandle, BackendRequest, OpResult, RenameItem};
use crate::model::{payload_to_data, Entry, RecordDetails, Row};
use crate::settings::Settings;
use crate::tools::{ColumnId, SelectCriterion, ToolKind, ALL_TOOLS};
use rows::{compute_rows, entry_count, SortSpec};
use select::{invert_selection, select_by_criterion, selectable_ids};
use viewport::Viewport;

/// How long an unanswered stop request keeps the stop control disabled.
const STOP_WAIT: Duration = Duration::from_secs(10);

pub struct App {
    backend: BackendHandle,
    settings: Settings,
    view: View,
    previous_view: View,
    active_tool: ToolKind,
    tools: HashMap<ToolKind, ToolState>,
    /// Derived pipeline output for the active tool.
    rows: Vec<Row>,
    found_count: usize,
    /// Tool a scan is currently running for, if any.
    scanning: Option<ToolKind>,
    stopping: bool,
    stop_requested_at: Option<Instant>,
    progress: ScanProgress,
    /// Tool a destructive operation was launched from.
    pending_op: Option<ToolKind>,
    viewport: Viewport,
    scroll_offset: u64,
    cursor: usize,
    status_message: String,
    logs: Vec<String>,
    /// Shared text buffer for the filter and the dialogs.
    input: String,
    filter_mode: bool,
    select_menu_index: usize,
    /// Track if 'g' was pressed for 'gg' sequence
    g_pressed: bool,
}

impl App {
    pub fn new(backend: BackendHandle, settings: Settings) -> Self {
        let tools = ALL_TOOLS
            .iter()
            .map(|&tool| (tool, ToolState::new(tool)))
            .collect();
        let active_tool = settings.ui.default_tool;

        let mut app = Self {
            backend,
            settings,
            view: View::Results,
            previous_view: View::Results,
            active_tool,
            tools,
            rows: Vec::new(),
            found_count: 0,
            scanning: None,
            stopping: false,
            stop_requested_at: None,
            progress: ScanProgress::default(),
            pending_op: None,
            // Terminal rows are one cell high; the overscan still applies.
            viewport: Viewport::new(1, viewport::OVERSCAN_ROWS),
            scroll_offset: 0,
            cursor: 0,
            status_message: String::from("Press 's' to scan | Tab to switch tool | '?' for help"),
            logs: Vec::new(),
            input: String::new(),
            filter_mode: false,
            select_menu_index: 0,
            g_pressed: false,
        };
        app.recompute_rows();
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<()> {
        loop {
            self.drain_backend_events();
            self.tick();

            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if !self.handle_key(key.code).await? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Time-based state changes; currently only the stop-request watchdog.
    fn tick(&mut self) {
        if self.stopping {
            if let Some(requested_at) = self.stop_requested_at {
                if requested_at.elapsed() >= STOP_WAIT {
                    self.stopping = false;
                    self.stop_requested_at = None;
                    warn!("stop request unanswered for {STOP_WAIT:?}");
                    self.push_log("Stop request still unanswered; stop re-enabled".to_string());
                }
            }
        }
    }

    fn drain_backend_events(&mut self) {
        while let Ok(event) = self.backend.events.try_recv() {
            self.handle_backend_event(event);
        }
    }

    fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::ScanProgress {
                current_step,
                total_steps,
                step_label,
            } => {
                self.progress = ScanProgress {
                    current_step,
                    total_steps,
                    step_label,
                };
            }
            BackendEvent::ScanResult {
                tool,
                message,
                payload,
            } => {
                let state = self.tools.get_mut(&tool).expect("every tool has state");
                state.data = payload_to_data(payload);
                state.selection.clear();
                self.scanning = None;
                self.stopping = false;
                self.stop_requested_at = None;
                self.progress = ScanProgress::default();
                self.push_log(message);
                self.status_message = format!("{} scan finished", tool.label());
                if tool == self.active_tool {
                    self.recompute_rows();
                }
            }
            BackendEvent::DeleteFilesResult(result) => {
                self.apply_op_result("Deleted", result);
            }
            BackendEvent::MoveFilesResult(result) => {
                self.apply_op_result("Moved", result);
            }
            BackendEvent::RenameExtResult(result) => {
                self.apply_op_result("Renamed", result);
            }
            BackendEvent::SaveResultDone { message } => {
                self.status_message = message.clone();
                self.push_log(message);
            }
        }
    }

    /// Fold a destructive-operation result back into the canonical data:
    /// drop the succeeded rows, then clear that tool's whole selection —
    /// never a partial prune.
    fn apply_op_result(&mut self, verb: &str, result: OpResult) {
        let tool = self.pending_op.take().unwrap_or(self.active_tool);
        let removed = result.success_paths.iter().cloned().collect();

        let state = self.tools.get_mut(&tool).expect("every tool has state");
        state.data.remove_paths(&removed);
        state.selection.clear();

        self.status_message = format!(
            "{verb} {} items, {} errors",
            result.success_paths.len(),
            result.errors.len()
        );
        self.push_log(self.status_message.clone());
        for error in result.errors {
            self.push_log(error);
        }
        if tool == self.active_tool {
            self.recompute_rows();
        }
    }

    fn push_log(&mut self, line: String) {
        info!("{line}");
        self.logs.push(line);
    }

    /// Rebuild the derived rows for the active tool. Fixed stage order:
    /// the canonical data was assembled on arrival, then filter, then sort,
    /// then separators.
    fn recompute_rows(&mut self) {
        let state = &self.tools[&self.active_tool];
        self.rows = compute_rows(
            &state.data,
            &state.filter,
            state.sort,
            self.active_tool.search_fields(),
        );
        self.found_count = entry_count(&self.rows);
        self.viewport.set_row_count(self.rows.len());
        if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
    }

    fn state(&self) -> &ToolState {
        &self.tools[&self.active_tool]
    }

    fn state_mut(&mut self) -> &mut ToolState {
        self.tools
            .get_mut(&self.active_tool)
            .expect("every tool has state")
    }

    fn switch_tool(&mut self, step: isize) {
        let index = ALL_TOOLS
            .iter()
            .position(|&tool| tool == self.active_tool)
            .unwrap_or(0) as isize;
        let next = (index + step).rem_euclid(ALL_TOOLS.len() as isize) as usize;
        self.active_tool = ALL_TOOLS[next];
        self.cursor = 0;
        self.scroll_offset = 0;
        self.filter_mode = false;
        self.input = self.state().filter.clone();
        self.recompute_rows();
    }

    async fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        match self.view {
            View::Results => return self.handle_results_key(code).await,
            View::Help | View::Logs => {
                self.view = self.previous_view;
            }
            View::SelectMenu => self.handle_select_menu_key(code),
            View::ConfirmDelete => self.handle_confirm_delete_key(code).await?,
            View::MoveDialog | View::RenameDialog | View::SaveDialog => {
                self.handle_dialog_key(code).await?;
            }
        }
        Ok(true)
    }

    async fn handle_results_key(&mut self, code: KeyCode) -> Result<bool> {
        if self.filter_mode {
            match code {
                KeyCode::Esc => {
                    self.filter_mode = false;
                    self.input.clear();
                    self.state_mut().filter.clear();
                    self.recompute_rows();
                }
                KeyCode::Enter => {
                    self.filter_mode = false;
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    let filter = self.input.trim().to_string();
                    self.state_mut().filter = filter;
                    self.recompute_rows();
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    let filter = self.input.trim().to_string();
                    self.state_mut().filter = filter;
                    self.recompute_rows();
                }
                _ => {}
            }
            return Ok(true);
        }

        match code {
            KeyCode::Char('q') => return Ok(false),
            KeyCode::Char('?') => {
                self.previous_view = View::Results;
                self.view = View::Help;
                self.g_pressed = false;
            }
            KeyCode::Char('L') => {
                self.previous_view = View::Results;
                self.view = View::Logs;
                self.g_pressed = false;
            }
            KeyCode::Tab => self.switch_tool(1),
            KeyCode::BackTab => self.switch_tool(-1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(1);
                self.g_pressed = false;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(-1);
                self.g_pressed = false;
            }
            KeyCode::PageDown => self.move_cursor(20),
            KeyCode::PageUp => self.move_cursor(-20),
            KeyCode::Char('g') => {
                if self.g_pressed {
                    self.cursor = 0;
                    self.g_pressed = false;
                } else {
                    self.g_pressed = true;
                }
            }
            KeyCode::Char('G') => {
                self.cursor = self.rows.len().saturating_sub(1);
                self.g_pressed = false;
            }
            KeyCode::Char(' ') => self.toggle_cursor_row(),
            KeyCode::Char('a') => self.set_all_visible(true),
            KeyCode::Char('A') => self.set_all_visible(false),
            KeyCode::Char('i') => self.invert(),
            KeyCode::Char('c') => {
                if !self.active_tool.criteria().is_empty() {
                    self.previous_view = View::Results;
                    self.select_menu_index = 0;
                    self.view = View::SelectMenu;
                } else {
                    self.status_message =
                        format!("{} has no selection criteria", self.active_tool.label());
                }
            }
            KeyCode::Char('o') => self.cycle_sort_column(),
            KeyCode::Char('d') => {
                if let Some(spec) = self.state().sort {
                    self.state_mut().sort = Some(SortSpec {
                        descending: !spec.descending,
                        ..spec
                    });
                    self.recompute_rows();
                }
            }
            KeyCode::Char('O') => {
                self.state_mut().sort = None;
                self.recompute_rows();
            }
            KeyCode::Char('/') => {
                self.filter_mode = true;
                self.input = self.state().filter.clone();
            }
            KeyCode::Char('s') => self.start_scan().await?,
            KeyCode::Char('x') => self.stop_scan().await?,
            KeyCode::Char('D') => {
                if self.state().selection.is_empty() {
                    self.status_message = "Nothing selected".to_string();
                } else {
                    self.previous_view = View::Results;
                    self.view = View::ConfirmDelete;
                }
            }
            KeyCode::Char('M') => self.open_dialog(View::MoveDialog),
            KeyCode::Char('R') => self.open_dialog(View::RenameDialog),
            KeyCode::Char('w') => {
                self.previous_view = View::Results;
                self.input.clear();
                self.view = View::SaveDialog;
            }
            _ => {}
        }
        Ok(true)
    }

    fn open_dialog(&mut self, view: View) {
        if self.state().selection.is_empty() {
            self.status_message = "Nothing selected".to_string();
            return;
        }
        self.previous_view = View::Results;
        self.input.clear();
        self.view = view;
    }

    fn handle_select_menu_key(&mut self, code: KeyCode) {
        let criteria = self.active_tool.criteria();
        match code {
            KeyCode::Esc => self.view = View::Results,
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_menu_index = (self.select_menu_index + 1) % (criteria.len() + 1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_menu_index =
                    (self.select_menu_index + criteria.len()) % (criteria.len() + 1);
            }
            KeyCode::Enter => {
                if self.select_menu_index < criteria.len() {
                    self.apply_criterion(criteria[self.select_menu_index]);
                } else {
                    self.invert();
                }
                self.view = View::Results;
            }
            _ => {}
        }
    }

    /// Replace the selection wholesale with one winner per group.
    fn apply_criterion(&mut self, criterion: SelectCriterion) {
        let state = self.state_mut();
        let winners = select_by_criterion(&state.data, criterion);
        let count = winners.len();
        state.selection.replace(winners);
        self.status_message = format!("{}: {count} rows selected", criterion.label());
    }

    fn invert(&mut self) {
        let state = self.state_mut();
        let universe = selectable_ids(&state.data);
        let inverted = invert_selection(&state.selection, &universe);
        let count = inverted.len();
        state.selection.replace(inverted);
        self.status_message = format!("Selection inverted: {count} rows");
    }

    async fn handle_confirm_delete_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let paths = self.state().selection.keys();
                self.pending_op = Some(self.active_tool);
                self.backend
                    .requests
                    .send(BackendRequest::DeleteFiles {
                        paths,
                        move_to_trash: self.settings.scan.move_deleted_files_to_trash,
                    })
                    .await?;
                self.status_message = "Deleting…".to_string();
                self.view = View::Results;
            }
            KeyCode::Char('n') | KeyCode::Esc => self.view = View::Results,
            _ => {}
        }
        Ok(())
    }

    async fn handle_dialog_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Esc => self.view = View::Results,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Enter => {
                let input = self.input.trim().to_string();
                if input.is_empty() {
                    return Ok(());
                }
                match self.view {
                    View::MoveDialog => {
                        let paths = self.state().selection.keys();
                        self.pending_op = Some(self.active_tool);
                        self.backend
                            .requests
                            .send(BackendRequest::MoveFiles {
                                paths,
                                destination: input,
                                copy_mode: false,
                                preserve_structure: false,
                                override_mode: false,
                            })
                            .await?;
                        self.status_message = "Moving…".to_string();
                    }
                    View::RenameDialog => {
                        let items = self
                            .state()
                            .selection
                            .keys()
                            .into_iter()
                            .map(|path| RenameItem {
                                path,
                                new_ext: input.clone(),
                            })
                            .collect();
                        self.pending_op = Some(self.active_tool);
                        self.backend
                            .requests
                            .send(BackendRequest::RenameExtensions { items })
                            .await?;
                        self.status_message = "Renaming…".to_string();
                    }
                    View::SaveDialog => {
                        self.backend
                            .requests
                            .send(BackendRequest::SaveResult {
                                tool: self.active_tool,
                                destination_dir: input,
                            })
                            .await?;
                        self.status_message = "Saving…".to_string();
                    }
                    _ => {}
                }
                self.view = View::Results;
            }
            _ => {}
        }
        Ok(())
    }

    async fn start_scan(&mut self) -> Result<()> {
        if self.scanning.is_some() {
            self.status_message = "A scan is already running".to_string();
            return Ok(());
        }
        self.scanning = Some(self.active_tool);
        self.progress = ScanProgress::default();
        self.backend
            .requests
            .send(BackendRequest::StartScan {
                tool: self.active_tool,
                settings: self.settings.scan.clone(),
            })
            .await?;
        self.status_message = format!("Scanning {}…", self.active_tool.label());
        Ok(())
    }

    /// One stop request at a time: the control stays disabled until a
    /// terminal event arrives, or the watchdog in `tick` re-arms it.
    async fn stop_scan(&mut self) -> Result<()> {
        if self.scanning.is_none() || self.stopping {
            return Ok(());
        }
        self.stopping = true;
        self.stop_requested_at = Some(Instant::now());
        self.backend.requests.send(BackendRequest::StopScan).await?;
        self.status_message = "Stopping…".to_string();
        Ok(())
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.rows.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    fn toggle_cursor_row(&mut self) {
        let Some(Row::Entry(entry)) = self.rows.get(self.cursor) else {
            return;
        };
        if entry.is_reference {
            self.status_message = "Reference rows cannot be selected".to_string();
            return;
        }
        let id = entry.id().to_string();
        self.state_mut().selection.toggle(&id);
    }

    /// Header-style select/unselect of every visible (filtered) entry.
    fn set_all_visible(&mut self, value: bool) {
        let ids: Vec<String> = self
            .rows
            .iter()
            .filter_map(Row::as_entry)
            .filter(|entry| !entry.is_reference)
            .map(|entry| entry.id().to_string())
            .collect();
        let count = ids.len();
        let state = self.state_mut();
        state
            .selection
            .set_all(ids.iter().map(String::as_str), value);
        self.status_message = if value {
            format!("Selected {count} visible rows")
        } else {
            "Visible rows unselected".to_string()
        };
    }

    fn cycle_sort_column(&mut self) {
        let columns = self.active_tool.columns();
        let next = match self.state().sort {
            None => columns[0].id,
            Some(spec) => {
                let index = columns
                    .iter()
                    .position(|column| column.id == spec.column)
                    .unwrap_or(0);
                columns[(index + 1) % columns.len()].id
            }
        };
        self.state_mut().sort = Some(SortSpec {
            column: next,
            descending: false,
        });
        self.recompute_rows();
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // tool tabs
                Constraint::Length(1), // counts
                Constraint::Min(3),    // table
                Constraint::Length(1), // status / progress
            ])
            .split(f.area());

        self.render_tabs(f, chunks[0]);
        self.render_counts(f, chunks[1]);
        self.render_table(f, chunks[2]);
        self.render_status(f, chunks[3]);

        match self.view {
            View::Help => self.render_help(f),
            View::Logs => self.render_logs(f),
            View::SelectMenu => self.render_select_menu(f),
            View::ConfirmDelete => self.render_confirm_delete(f),
            View::MoveDialog => self.render_input_dialog(f, "Move to directory"),
            View::RenameDialog => self.render_input_dialog(f, "New extension"),
            View::SaveDialog => self.render_input_dialog(f, "Save results to directory"),
            View::Results => {}
        }
    }

    fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for &tool in &ALL_TOOLS {
            let style = if tool == self.active_tool {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} ", tool.label()), style));
            spans.push(Span::raw(" "));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_counts(&self, f: &mut Frame, area: Rect) {
        let state = self.state();
        let sort_text = match state.sort {
            None => "none".to_string(),
            Some(spec) => {
                let title = self
                    .active_tool
                    .columns()
                    .iter()
                    .find(|column| column.id == spec.column)
                    .map_or("?", |column| column.title);
                format!("{title} {}", if spec.descending { "desc" } else { "asc" })
            }
        };
        let filter_text = if self.filter_mode {
            format!("{}▏", state.filter)
        } else if state.filter.is_empty() {
            "none".to_string()
        } else {
            state.filter.clone()
        };
        let line = format!(
            " total {} | found {} | selected {} | sort: {} | filter: {}",
            state.data.total_count(),
            self.found_count,
            state.selection.len(),
            sort_text,
            filter_text,
        );
        f.render_widget(
            Paragraph::new(line).style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }

    fn render_table(&mut self, f: &mut Frame, area: Rect) {
        let columns = self.active_tool.columns();
        let page_height = u32::from(area.height.saturating_sub(3).max(1)); // borders + header

        // Keep the cursor inside the scroll window before asking the
        // viewport what to render.
        let cursor_offset = if self.rows.is_empty() {
            0
        } else {
            self.viewport.row_offset(self.cursor.min(self.rows.len() - 1))
        };
        if cursor_offset < self.scroll_offset {
            self.scroll_offset = cursor_offset;
        } else if cursor_offset + 1 > self.scroll_offset + u64::from(page_height) {
            self.scroll_offset = cursor_offset + 1 - u64::from(page_height);
        }
        self.scroll_offset = self.viewport.clamp_scroll(self.scroll_offset, page_height);

        let Some(window) = self.viewport.window(self.scroll_offset, page_height) else {
            let placeholder = Paragraph::new("No results. Press 's' to scan.")
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} ", self.active_tool.label())),
                )
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(placeholder, area);
            return;
        };

        let mut header_cells = vec![Cell::from(" ")];
        header_cells.extend(columns.iter().map(|column| {
            Cell::from(column.title).style(Style::default().add_modifier(Modifier::BOLD))
        }));

        let selection = &self.state().selection;
        let cursor = self.cursor;
        let visible = self.rows[window.first..=window.last]
            .iter()
            .enumerate()
            .map(|(offset, row)| {
                let index = window.first + offset;
                match row {
                    Row::Separator { .. } => TableRow::new(vec![Cell::from(Span::styled(
                        "─".repeat(area.width.saturating_sub(2) as usize),
                        Style::default().fg(Color::DarkGray),
                    ))]),
                    Row::Entry(entry) => {
                        let marker = if entry.is_reference {
                            "ref"
                        } else if selection.contains(entry.id()) {
                            "[x]"
                        } else {
                            "[ ]"
                        };
                        let mut cells = vec![Cell::from(marker)];
                        cells.extend(
                            columns
                                .iter()
                                .map(|column| Cell::from(cell_text(entry, column.id))),
                        );
                        let mut style = Style::default();
                        if entry.is_reference {
                            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
                        }
                        if index == cursor {
                            style = style.bg(Color::Rgb(40, 40, 60));
                        }
                        TableRow::new(cells).style(style)
                    }
                }
            });

        let mut widths = vec![Constraint::Length(3)];
        widths.extend(columns.iter().map(|column| Constraint::Min(column.width)));

        let table = Table::new(visible, widths)
            .header(TableRow::new(header_cells))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.active_tool.label())),
            );
        f.render_widget(table, area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let line = if let Some(tool) = self.scanning {
            let ScanProgress {
                current_step,
                total_steps,
                step_label,
            } = &self.progress;
            let stop_hint = if self.stopping {
                " (stopping…)"
            } else {
                " ('x' to stop)"
            };
            format!(
                " Scanning {}: [{current_step}/{total_steps}] {step_label}{stop_hint}",
                tool.label()
            )
        } else {
            format!(" {}", self.status_message)
        };
        f.render_widget(
            Paragraph::new(line).style(Style::default().fg(Color::Cyan)),
            area,
        );
    }

    fn render_help(&self, f: &mut Frame) {
        let text = vec![
            "Tab / Shift-Tab  switch tool",
            "s / x            start / stop scan",
            "j / k, gg / G    move cursor",
            "Space            toggle row selection",
            "a / A            select / unselect all visible",
            "i                invert selection",
            "c                auto-selection menu (grouped tools)",
            "o / d / O        sort column / direction / clear",
            "/                filter (Esc clears)",
            "D / M / R        delete / move / rename selected",
            "w                save results as JSON",
            "L                logs, q quit",
        ]
        .join("\n");
        self.render_popup(f, "Help", &text, 60, 14);
    }

    fn render_logs(&self, f: &mut Frame) {
        let start = self.logs.len().saturating_sub(12);
        let text = self.logs[start..].join("\n");
        self.render_popup(f, "Logs", &text, 80, 14);
    }

    fn render_select_menu(&self, f: &mut Frame) {
        let criteria = self.active_tool.criteria();
        let mut lines: Vec<String> = criteria
            .iter()
            .enumerate()
            .map(|(index, criterion)| {
                let marker = if index == self.select_menu_index {
                    ">"
                } else {
                    " "
                };
                format!("{marker} {}", criterion.label())
            })
            .collect();
        let marker = if self.select_menu_index == criteria.len() {
            ">"
        } else {
            " "
        };
        lines.push(format!("{marker} Invert selection"));
        self.render_popup(f, "Select", &lines.join("\n"), 46, criteria.len() as u16 + 1);
    }

    fn render_confirm_delete(&self, f: &mut Frame) {
        let text = format!(
            "Delete {} selected items? (y/n)\nmove to trash: {}",
            self.state().selection.len(),
            self.settings.scan.move_deleted_files_to_trash,
        );
        self.render_popup(f, "Delete", &text, 46, 2);
    }

    fn render_input_dialog(&self, f: &mut Frame, title: &str) {
        let text = format!("{}▏\n(Enter to confirm, Esc to cancel)", self.input);
        self.render_popup(f, title, &text, 60, 2);
    }

    fn render_popup(&self, f: &mut Frame, title: &str, text: &str, width: u16, height: u16) {
        let area = centered_rect(f.area(), width, height + 2);
        f.render_widget(Clear, area);
        let popup = Paragraph::new(text.to_string())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {title} ")),
            );
        f.render_widget(popup, area);
    }
}

/// One cell of the results table.
fn cell_text(entry: &Entry, column: ColumnId) -> String {
    match column {
        ColumnId::Size => entry.size_text.clone(),
        ColumnId::FileName | ColumnId::FolderName => entry.file_name.clone(),
        ColumnId::Path => entry.id().to_string(),
        ColumnId::Modified => entry.modified_text.clone(),
        ColumnId::Similarity => entry.similarity_text.clone(),
        ColumnId::Dimensions => entry.dimensions_text.clone(),
        ColumnId::Bitrate => entry.bitrate_text.clone(),
        ColumnId::Title | ColumnId::Artist | ColumnId::Year | ColumnId::Length => {
            match &entry.raw.details {
                RecordDetails::Music {
                    title,
                    artist,
                    year,
                    length,
                    ..
                } => match column {
                    ColumnId::Title => title.clone(),
                    ColumnId::Artist => artist.clone(),
                    ColumnId::Year => year.clone(),
                    _ => length.clone(),
                },
                _ => String::new(),
            }
        }
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
