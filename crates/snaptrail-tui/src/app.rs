//! Main application for the TUI.

use crate::terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui};
use chrono::Local;
use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use snaptrail_core::{
    snapshots_containing, ActionId, ActionReceiver, ActionRequest, BrowseError, BrowseResult,
    BrowserColumn, FsWatcher, LiveFs, NavAction, NavigationController, SnapshotBrowserEntry,
    SnapshotColumn, StableTable, StatusSink,
};
use snaptrail_snapshot::{Dataset, SnapshotError, SnapshotStore};
use snaptrail_tui_core::{Event, EventHandler, KeyAction, KeybindConfig, KeybindManager, Theme};
use snaptrail_tui_widgets::{
    ActionDialog, BrowserColumns, HelpOverlay, SnapshotColumns, StatusWidget, TableView, Toast,
    ToastManager,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const TICK_RATE: Duration = Duration::from_millis(250);

type SnapshotTable = StableTable<SnapshotBrowserEntry, SnapshotColumn>;

/// Which pane receives cursor keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Browser,
    Snapshots,
}

impl Pane {
    fn toggled(self) -> Self {
        match self {
            Pane::Browser => Pane::Snapshots,
            Pane::Snapshots => Pane::Browser,
        }
    }
}

/// Startup settings for [`App`].
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Directory (or file) to open first.
    pub start: PathBuf,
    /// Snapshot to compare against from the start.
    pub snapshot: Option<String>,
    /// Refresh when the current directory changes on disk.
    pub watch: bool,
    pub theme: Theme,
    pub keybinds: KeybindConfig,
    pub sort_column: BrowserColumn,
    pub sort_inverted: bool,
}

impl AppOptions {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
            snapshot: None,
            watch: true,
            theme: Theme::default(),
            keybinds: KeybindConfig::default(),
            sort_column: BrowserColumn::Name,
            sort_inverted: false,
        }
    }
}

/// Raised by the navigation controller callbacks and handled after each
/// input event.
#[derive(Debug)]
enum NavNotice {
    PathChanged(PathBuf),
    SelectionChanged,
}

/// The snapshot browser application.
pub struct App {
    nav: NavigationController,
    fs: Arc<dyn LiveFs>,
    store: Arc<dyn SnapshotStore>,
    notices: mpsc::UnboundedReceiver<NavNotice>,

    /// Dataset of the current directory, snapshots loaded.
    dataset: Option<Dataset>,
    snapshots: SnapshotTable,

    focus: Pane,
    browser_view: TableView,
    snapshot_view: TableView,
    theme: Theme,
    keybinds: KeybindManager,
    help: HelpOverlay,
    toasts: ToastManager,
    status: StatusWidget,

    dialog: Option<ActionDialog>,
    pending_action: Option<ActionReceiver>,

    events: EventHandler,
    watcher: Option<FsWatcher>,
    needs_redraw: bool,
    quit: bool,
}

impl App {
    /// Open `options.start` and load its dataset.
    ///
    /// Fails when the start path cannot be listed or the requested snapshot
    /// does not exist.
    pub fn new(
        options: AppOptions,
        fs: Arc<dyn LiveFs>,
        store: Arc<dyn SnapshotStore>,
    ) -> BrowseResult<Self> {
        let mut nav = NavigationController::new(Arc::clone(&fs), Arc::clone(&store))
            .with_sort(options.sort_column, options.sort_inverted);

        let (notice_tx, notices) = mpsc::unbounded_channel();
        let path_tx = notice_tx.clone();
        nav.on_path_changed(move |path| {
            let _ = path_tx.send(NavNotice::PathChanged(path.to_path_buf()));
        });
        nav.on_selection_changed(move |_| {
            let _ = notice_tx.send(NavNotice::SelectionChanged);
        });

        let mut snapshots = StableTable::new(SnapshotColumn::compare);
        snapshots.set_columns(
            SnapshotColumn::ALL.to_vec(),
            Some(SnapshotColumn::Created),
            true,
        );

        let events = EventHandler::new();
        let mut toasts = ToastManager::new();
        let watcher = if options.watch {
            let sender = events.sender();
            match FsWatcher::new(move |dir| {
                let _ = sender.send(Event::FsChanged(dir));
            }) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    toasts.error(&format!("File watching unavailable: {e}"));
                    None
                }
            }
        } else {
            None
        };

        let keybinds = KeybindManager::new(&options.keybinds);
        let unknown = options.keybinds.unknown_actions();
        if !unknown.is_empty() {
            warn!(actions = ?unknown, "Ignoring keybinds for unknown actions");
        }

        let mut app = Self {
            nav,
            fs,
            store,
            notices,
            dataset: None,
            snapshots,
            focus: Pane::Browser,
            browser_view: TableView::new("Files"),
            snapshot_view: TableView::new("Snapshots"),
            theme: options.theme,
            help: HelpOverlay::new(&keybinds),
            keybinds,
            toasts,
            status: StatusWidget::new(),
            dialog: None,
            pending_action: None,
            events,
            watcher,
            needs_redraw: true,
            quit: false,
        };

        app.nav.set_path(&options.start)?;
        app.process_notices();

        if let Some(name) = &options.snapshot {
            let snapshot = app
                .dataset
                .as_ref()
                .and_then(|d| d.find_snapshot(name))
                .cloned()
                .ok_or_else(|| BrowseError::Snapshot(SnapshotError::not_found(name.as_str())))?;
            app.nav.set_selected_snapshot(Some(snapshot))?;
            app.sync_snapshot_cursor();
            app.process_notices();
        }

        Ok(app)
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    pub fn focus(&self) -> Pane {
        self.focus
    }

    pub fn is_running(&self) -> bool {
        !self.quit
    }

    /// Run the TUI until the operator quits.
    pub async fn run(&mut self) -> io::Result<()> {
        install_panic_hook();
        let mut terminal = setup_terminal()?;
        self.events.start(TICK_RATE);
        info!(path = %self.nav.path().display(), "TUI started");

        let result = self.event_loop(&mut terminal).await;

        restore_terminal();
        info!("TUI stopped");
        result
    }

    async fn event_loop(&mut self, terminal: &mut Tui) -> io::Result<()> {
        while !self.quit {
            if self.needs_redraw {
                terminal.draw(|frame| self.draw(frame))?;
                self.needs_redraw = false;
            }

            tokio::select! {
                Some(event) = self.events.next() => {
                    self.handle_event(event);
                }
                result = next_action(&mut self.pending_action) => {
                    self.handle_action_result(result);
                }
                else => break,
            }
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(..) => self.needs_redraw = true,
            Event::Tick => {
                if self.toasts.cleanup() {
                    self.needs_redraw = true;
                }
            }
            Event::FsChanged(dir) => self.handle_fs_changed(dir),
        }
    }

    /// Refresh once for a burst of change notifications.
    fn handle_fs_changed(&mut self, dir: PathBuf) {
        let mut stale = dir == self.nav.path();
        for event in self.events.drain() {
            match event {
                Event::FsChanged(dir) => stale |= dir == self.nav.path(),
                other => self.handle_event(other),
            }
        }
        if !stale {
            return;
        }

        debug!(path = %self.nav.path().display(), "Directory changed on disk");
        if let Err(e) = self.nav.refresh() {
            self.report(e);
        }
        self.process_notices();
        self.needs_redraw = true;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.needs_redraw = true;

        if let Some(dialog) = &mut self.dialog {
            if dialog.handle_key(key) {
                self.dialog = None;
            }
            return;
        }

        let action = self.keybinds.find_action(&key);
        if self.help.is_visible() {
            self.help.hide();
            if action != Some(KeyAction::AppExit) {
                return;
            }
        }
        let Some(action) = action else {
            return;
        };

        let result = match action {
            KeyAction::AppExit => {
                self.quit = true;
                Ok(())
            }
            KeyAction::HelpToggle => {
                self.help.toggle();
                Ok(())
            }
            KeyAction::FocusNext | KeyAction::FocusPrev => {
                self.focus = self.focus.toggled();
                Ok(())
            }
            KeyAction::Refresh => self.refresh(),
            KeyAction::ActionMenu => {
                self.open_action_menu();
                Ok(())
            }
            _ => match self.focus {
                Pane::Browser => self.handle_browser_key(action),
                Pane::Snapshots => self.handle_snapshot_key(action),
            },
        };

        if let Err(e) = result {
            self.report(e);
            self.sync_snapshot_cursor();
        }
        self.process_notices();
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let action = match mouse.kind {
            MouseEventKind::ScrollUp => KeyAction::CursorUp,
            MouseEventKind::ScrollDown => KeyAction::CursorDown,
            _ => return,
        };
        let result = match self.focus {
            Pane::Browser => self.handle_browser_key(action),
            Pane::Snapshots => self.handle_snapshot_key(action),
        };
        if let Err(e) = result {
            self.report(e);
        }
        self.process_notices();
        self.needs_redraw = true;
    }

    fn handle_browser_key(&mut self, action: KeyAction) -> BrowseResult<()> {
        let page = self.browser_view.page_rows();
        let nav_action = match action {
            KeyAction::CursorUp => NavAction::Up,
            KeyAction::CursorDown => NavAction::Down,
            KeyAction::PageUp => NavAction::PageUp(page),
            KeyAction::PageDown => NavAction::PageDown(page),
            KeyAction::First => NavAction::First,
            KeyAction::Last => NavAction::Last,
            KeyAction::NavigateBack => NavAction::Left,
            KeyAction::NavigateInto => NavAction::Right,
            KeyAction::Confirm => NavAction::Confirm,
            KeyAction::ToggleMark => NavAction::ToggleMark,
            KeyAction::ClearMarks => NavAction::ClearMarks,
            _ => return Ok(()),
        };
        self.nav.handle(nav_action)
    }

    /// Cursor keys in the snapshot pane. The row under the cursor is the
    /// snapshot compared against; the header row means the live tree only.
    fn handle_snapshot_key(&mut self, action: KeyAction) -> BrowseResult<()> {
        let on_header = self.snapshots.is_header_selected() && !self.snapshots.is_empty();
        let page = self.snapshot_view.page_rows();
        match action {
            KeyAction::CursorUp => self.snapshots.move_up(),
            KeyAction::CursorDown => self.snapshots.move_down(),
            KeyAction::PageUp => self.snapshots.page_up(page),
            KeyAction::PageDown => self.snapshots.page_down(page),
            KeyAction::First => self.snapshots.move_to_first(),
            KeyAction::Last => self.snapshots.move_to_last(),
            KeyAction::NavigateBack if on_header => {
                self.snapshots.cycle_sort_column(false);
            }
            KeyAction::NavigateInto if on_header => {
                self.snapshots.cycle_sort_column(true);
            }
            KeyAction::Confirm if on_header => {
                self.snapshots.toggle_sort_direction();
            }
            KeyAction::NavigateBack => self.snapshots.select_index(None),
            KeyAction::NavigateInto | KeyAction::Confirm => {
                self.focus = Pane::Browser;
            }
            _ => {}
        }
        self.apply_snapshot_cursor()
    }

    /// Compare against the snapshot under the snapshot cursor.
    fn apply_snapshot_cursor(&mut self) -> BrowseResult<()> {
        let wanted = self.snapshots.selected().map(|e| Arc::clone(&e.snapshot));
        let current = self.nav.selected_snapshot().map(|s| &s.id);
        if wanted.as_ref().map(|s| &s.id) == current {
            return Ok(());
        }
        debug!(snapshot = ?wanted.as_ref().map(|s| &s.name), "Switching snapshot");
        self.nav.set_selected_snapshot(wanted)
    }

    /// Put the snapshot cursor on the snapshot being compared against.
    fn sync_snapshot_cursor(&mut self) {
        let id = self.nav.selected_snapshot().map(|s| s.id.clone());
        self.snapshots.select(id.as_ref());
    }

    fn refresh(&mut self) -> BrowseResult<()> {
        let path = self.nav.path().to_path_buf();
        self.load_dataset(&path);
        self.nav.refresh()?;
        self.update_snapshot_rows();
        Ok(())
    }

    fn open_action_menu(&mut self) {
        let targets = self.nav.action_targets();
        let actions = ActionId::available(&targets, self.nav.selected_snapshot().is_some());
        let paths: Vec<PathBuf> = targets.iter().map(|e| e.id().to_path_buf()).collect();

        let (dialog, receiver) = ActionDialog::open(paths, actions);
        self.dialog = Some(dialog);
        self.pending_action = Some(receiver);
    }

    fn handle_action_result(&mut self, result: Option<ActionRequest>) {
        self.pending_action = None;
        self.needs_redraw = true;
        match result {
            Some(request) => {
                info!(
                    action = ?request.action,
                    targets = ?request.targets,
                    "Action requested"
                );
                let message = match request.targets.len() {
                    0 => "for the current directory".to_string(),
                    1 => "for 1 entry".to_string(),
                    n => format!("for {n} entries"),
                };
                self.toasts
                    .push(Toast::success(request.action.label()).with_message(message));
            }
            None => debug!("Action menu dismissed"),
        }
    }

    fn report(&mut self, error: BrowseError) {
        warn!(error = %error, "Browse error");
        self.toasts.report(&error);
    }

    /// Apply the controller notifications queued since the last call.
    fn process_notices(&mut self) {
        loop {
            let mut path_changed = None;
            let mut selection_changed = false;
            while let Ok(notice) = self.notices.try_recv() {
                match notice {
                    NavNotice::PathChanged(path) => path_changed = Some(path),
                    NavNotice::SelectionChanged => selection_changed = true,
                }
            }
            if path_changed.is_none() && !selection_changed {
                break;
            }
            if let Some(path) = path_changed {
                self.handle_path_changed(&path);
            }
            self.update_snapshot_rows();
        }
    }

    fn handle_path_changed(&mut self, path: &Path) {
        if let Some(watcher) = &mut self.watcher {
            if let Err(e) = watcher.watch(path) {
                warn!(path = %path.display(), error = %e, "Failed to watch directory");
            }
        }

        self.load_dataset(path);

        let mountpoint = self.dataset.as_ref().map(|d| d.mountpoint.as_path());
        let foreign = self
            .nav
            .selected_snapshot()
            .is_some_and(|s| Some(s.dataset.as_path()) != mountpoint);
        if foreign {
            self.toasts
                .info("Left the snapshot's dataset; showing the live tree");
            if let Err(e) = self.nav.set_selected_snapshot(None) {
                self.report(e);
            }
        }
    }

    fn load_dataset(&mut self, path: &Path) {
        self.dataset = match self.store.dataset_for(path) {
            Ok(dataset) => {
                debug!(
                    mountpoint = %dataset.mountpoint.display(),
                    snapshots = dataset.snapshots.len(),
                    "Loaded dataset"
                );
                Some(dataset)
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No dataset");
                None
            }
        };
    }

    /// Rebuild the snapshot list for the entry under the browser cursor.
    fn update_snapshot_rows(&mut self) {
        let snapshots = self
            .dataset
            .as_ref()
            .map(|d| d.snapshots.as_slice())
            .unwrap_or(&[]);
        let rows = snapshots_containing(
            self.store.as_ref(),
            self.fs.as_ref(),
            snapshots,
            Some(self.nav.tracked_path()),
        );
        self.snapshots.set_data(rows);
        self.sync_snapshot_cursor();
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(44)])
            .split(rows[0]);
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(6)])
            .split(columns[1]);

        self.browser_view
            .set_title(self.nav.path().display().to_string());
        self.browser_view.render(
            frame,
            columns[0],
            self.nav.table(),
            &BrowserColumns,
            &self.theme,
            self.focus == Pane::Browser,
        );
        self.snapshot_view.render(
            frame,
            side[0],
            &self.snapshots,
            &SnapshotColumns,
            &self.theme,
            self.focus == Pane::Snapshots,
        );
        self.draw_dataset_info(frame, side[1]);

        self.update_status();
        self.status.render(frame, rows[1], &self.theme);

        self.toasts.render(frame, area, &self.theme);
        if let Some(dialog) = &mut self.dialog {
            dialog.render(frame, area, &self.theme);
        }
        self.help.render(frame, area, &self.theme);
    }

    fn draw_dataset_info(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let label = |text: &'static str| Span::styled(format!("{text:<10}"), theme.muted_style());

        let lines = match &self.dataset {
            Some(dataset) => {
                let comparing = match self.nav.selected_snapshot() {
                    Some(s) => vec![
                        Span::styled(s.name.clone(), theme.primary_style()),
                        Span::styled(
                            format!(
                                "  {}",
                                s.created.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                            ),
                            theme.muted_style(),
                        ),
                    ],
                    None => vec![Span::styled("live only", theme.muted_style())],
                };
                vec![
                    Line::from(vec![
                        label("Dataset"),
                        Span::styled(dataset.name.clone(), theme.bold()),
                    ]),
                    Line::from(vec![
                        label("Mount"),
                        Span::styled(dataset.mountpoint.display().to_string(), theme.text_style()),
                    ]),
                    Line::from(vec![
                        label("Snapshots"),
                        Span::styled(dataset.snapshots.len().to_string(), theme.text_style()),
                    ]),
                    Line::from([vec![label("Comparing")], comparing].concat()),
                ]
            }
            None => vec![Line::from(Span::styled(
                "No dataset for this directory",
                theme.muted_style(),
            ))],
        };

        let block = Block::default()
            .title(Span::styled(" Dataset ", theme.border_style(false)))
            .borders(Borders::ALL)
            .border_style(theme.border_style(false))
            .style(theme.panel_style());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn update_status(&mut self) {
        let table = self.nav.table();
        self.status.set_path(self.nav.path());
        self.status
            .set_snapshot(self.nav.selected_snapshot().map(|s| s.name.as_str()));
        self.status
            .set_counts(table.len(), table.multi_selection_len());
        self.status.set_sort(
            table
                .sort_column()
                .map(|c| format!("{} {}", c.title(), table.sort_direction().arrow())),
        );
        self.status.set_watching(self.watcher.is_some());
    }
}

/// Resolves with the action menu's answer; never resolves while no menu
/// is waiting.
async fn next_action(pending: &mut Option<ActionReceiver>) -> Option<ActionRequest> {
    match pending {
        Some(receiver) => receiver.await.ok(),
        None => std::future::pending().await,
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("nav", &self.nav)
            .field("focus", &self.focus)
            .field("dialog_open", &self.dialog.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use snaptrail_core::{DiffState, LocalFs};
    use snaptrail_snapshot::{ZfsStore, SNAPSHOT_DIR};
    use std::fs;
    use tempfile::TempDir;

    /// tank/a/{foo.txt, sub/, z.txt} with snapshot `monday` holding
    /// tank/a/{foo.txt, gone.txt}.
    fn tank() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tank");
        fs::create_dir_all(root.join("a/sub")).unwrap();
        fs::write(root.join("a/foo.txt"), "foo").unwrap();
        fs::write(root.join("a/z.txt"), "z").unwrap();

        let snap = root.join(SNAPSHOT_DIR).join("monday");
        fs::create_dir_all(snap.join("a")).unwrap();
        fs::write(snap.join("a/foo.txt"), "old foo").unwrap();
        fs::write(snap.join("a/gone.txt"), "gone").unwrap();
        (dir, root)
    }

    fn app(root: &Path, options: AppOptions) -> BrowseResult<App> {
        App::new(
            options,
            Arc::new(LocalFs::new()),
            Arc::new(ZfsStore::new(vec![root.to_path_buf()])),
        )
    }

    fn options(start: PathBuf) -> AppOptions {
        AppOptions {
            watch: false,
            ..AppOptions::new(start)
        }
    }

    fn press(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }

    fn press_code(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn selected_name(app: &App) -> Option<String> {
        app.navigation().selection().map(|e| e.name.clone())
    }

    #[test]
    fn test_opens_start_directory_with_dataset() {
        let (_dir, root) = tank();
        let app = app(&root, options(root.join("a"))).unwrap();

        assert_eq!(app.navigation().path(), root.join("a"));
        assert_eq!(app.snapshots.len(), 1);
        assert!(app.dataset.is_some());
        assert!(app.navigation().selected_snapshot().is_none());
        assert!(app.is_running());
    }

    #[test]
    fn test_start_snapshot_by_name() {
        let (_dir, root) = tank();
        let app = app(
            &root,
            AppOptions {
                snapshot: Some("monday".to_string()),
                ..options(root.join("a"))
            },
        )
        .unwrap();

        assert_eq!(
            app.navigation().selected_snapshot().map(|s| s.name.as_str()),
            Some("monday")
        );
        assert_eq!(
            app.snapshots.selected().map(|e| e.snapshot.name.as_str()),
            Some("monday")
        );
        let gone = root.join("a/gone.txt");
        let entry = app
            .navigation()
            .entries()
            .iter()
            .find(|e| e.id() == gone)
            .unwrap();
        assert_eq!(entry.diff_state, DiffState::Deleted);
    }

    #[test]
    fn test_unknown_start_snapshot_fails() {
        let (_dir, root) = tank();
        let err = app(
            &root,
            AppOptions {
                snapshot: Some("friday".to_string()),
                ..options(root.join("a"))
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BrowseError::Snapshot(SnapshotError::NotFound(_))
        ));
    }

    #[test]
    fn test_browser_keys_enter_and_leave() {
        let (_dir, root) = tank();
        let mut app = app(&root, options(root.join("a"))).unwrap();

        press(&mut app, 'j');
        assert_eq!(selected_name(&app).as_deref(), Some("foo.txt"));
        press(&mut app, 'j');
        assert_eq!(selected_name(&app).as_deref(), Some("sub"));

        press(&mut app, 'l');
        assert_eq!(app.navigation().path(), root.join("a/sub"));

        press(&mut app, 'h');
        assert_eq!(app.navigation().path(), root.join("a"));
        assert_eq!(selected_name(&app).as_deref(), Some("sub"));
    }

    #[test]
    fn test_snapshot_pane_switches_comparison() {
        let (_dir, root) = tank();
        let mut app = app(&root, options(root.join("a"))).unwrap();

        press_code(&mut app, KeyCode::Tab);
        assert_eq!(app.focus(), Pane::Snapshots);

        press(&mut app, 'j');
        assert_eq!(
            app.navigation().selected_snapshot().map(|s| s.name.as_str()),
            Some("monday")
        );
        assert!(app
            .navigation()
            .entries()
            .iter()
            .any(|e| e.diff_state == DiffState::Deleted));

        // back to the header: live tree only
        press(&mut app, 'h');
        assert!(app.navigation().selected_snapshot().is_none());
        assert!(app
            .navigation()
            .entries()
            .iter()
            .all(|e| e.diff_state == DiffState::Unknown));
    }

    #[test]
    fn test_snapshot_contains_follows_cursor() {
        let (_dir, root) = tank();
        let mut app = app(&root, options(root.join("a"))).unwrap();

        // foo.txt exists in monday
        press(&mut app, 'j');
        assert!(app.snapshots.entries()[0].contains_tracked);

        // z.txt does not
        press_code(&mut app, KeyCode::End);
        assert_eq!(selected_name(&app).as_deref(), Some("z.txt"));
        assert!(!app.snapshots.entries()[0].contains_tracked);
    }

    #[tokio::test]
    async fn test_action_menu_delivers_request() {
        let (_dir, root) = tank();
        let mut app = app(&root, options(root.join("a"))).unwrap();

        press(&mut app, 'j');
        press(&mut app, 'a');
        assert!(app.dialog.is_some());

        // Delete is the only entry-level action for a live-only comparison
        press_code(&mut app, KeyCode::Enter);
        assert!(app.dialog.is_none());

        let request = next_action(&mut app.pending_action).await.unwrap();
        assert_eq!(request.action, ActionId::Delete);
        assert_eq!(request.targets, vec![root.join("a/foo.txt")]);

        app.handle_action_result(Some(request));
        assert!(app.pending_action.is_none());
        assert_eq!(app.toasts.toasts().len(), 1);
    }

    #[tokio::test]
    async fn test_dismissed_action_menu_resolves_none() {
        let (_dir, root) = tank();
        let mut app = app(&root, options(root.join("a"))).unwrap();

        press(&mut app, 'a');
        press_code(&mut app, KeyCode::Esc);
        assert!(app.dialog.is_none());
        assert!(next_action(&mut app.pending_action).await.is_none());
    }

    #[test]
    fn test_fs_change_refreshes_current_directory() {
        let (_dir, root) = tank();
        let dir = root.join("a");
        let mut app = app(&root, options(dir.clone())).unwrap();
        let before = app.navigation().entries().len();

        fs::write(dir.join("new.txt"), "new").unwrap();
        app.handle_event(Event::FsChanged(root.join("elsewhere")));
        assert_eq!(app.navigation().entries().len(), before);

        app.handle_event(Event::FsChanged(dir.clone()));
        assert_eq!(app.navigation().entries().len(), before + 1);
    }

    #[test]
    fn test_help_overlay_swallows_next_key() {
        let (_dir, root) = tank();
        let mut app = app(&root, options(root.join("a"))).unwrap();

        press(&mut app, '?');
        assert!(app.help.is_visible());
        press(&mut app, 'j');
        assert!(!app.help.is_visible());
        assert!(app.navigation().selection().is_none());

        press(&mut app, 'q');
        assert!(!app.is_running());
    }

    #[test]
    fn test_missing_start_directory_fails() {
        let (_dir, root) = tank();
        let err = app(&root, options(root.join("nope"))).unwrap_err();
        assert!(matches!(err, BrowseError::NotFound { .. }));
    }
}
