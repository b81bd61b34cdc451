use anyhow::{Context, Result};
use catalog_editor_config::{Config, FontOption, ThemeConfig};
use catalog_editor_engine::{
    Alignment, BlockType, Cmd, DescriptionEditor, DispatchOutcome, Document, EditorOptions,
    HeadingLevel, HtmlTheme, ListKind, Point, Selection, TextFormat, ToolbarAction, ToolbarState,
    UserPrompt,
    composer::PLACEHOLDER,
    toolbar::dispatcher::{EMBED_PROMPT, LINK_PROMPT},
    toolbar::options::label_for,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::{
    cell::Cell,
    env,
    fs::File,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    rc::Rc,
};

mod render;

/// Answers the dispatcher's prompt with what the user typed into the
/// overlay and collects alerts for display
struct OverlayPrompt {
    answer: Option<String>,
    alerts: Vec<String>,
}

impl OverlayPrompt {
    fn answering(answer: Option<String>) -> Self {
        Self {
            answer,
            alerts: Vec::new(),
        }
    }
}

impl UserPrompt for OverlayPrompt {
    fn prompt(&mut self, _message: &str) -> Option<String> {
        self.answer.take()
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAction {
    Link,
    Embed,
}

enum Mode {
    Editing,
    Prompt {
        action: PendingAction,
        input: String,
    },
    Alert(String),
}

struct Args {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    /// Write the effective config to the user config path and exit
    init_config: bool,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut input = None;
    let mut output = None;
    let mut init_config = false;
    let mut rest = args.iter().skip(1);

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--output" | "-o" => {
                let path = rest.next().ok_or("--output needs a path")?;
                output = Some(PathBuf::from(path));
            }
            "--init-config" => init_config = true,
            flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
            path if input.is_none() => input = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument {extra}")),
        }
    }

    Ok(Args {
        input,
        output,
        init_config,
    })
}

fn theme_from(config: &ThemeConfig) -> HtmlTheme {
    HtmlTheme {
        bold: config.bold.clone(),
        italic: config.italic.clone(),
        underline: config.underline.clone(),
        strikethrough: config.strikethrough.clone(),
        code: config.code.clone(),
    }
}

struct App {
    editor: DescriptionEditor,
    config: Config,
    mode: Mode,
    output_path: Option<PathBuf>,
    output_bytes: Rc<Cell<usize>>,
}

impl App {
    fn new(document: Document, config: Config, output_path: Option<PathBuf>) -> Self {
        let output_bytes = Rc::new(Cell::new(0));
        let written = Rc::clone(&output_bytes);
        let target = output_path.clone();

        let options = EditorOptions {
            namespace: config.namespace.clone(),
            history_depth: config.history_depth,
            theme: theme_from(&config.theme),
        };
        let editor = DescriptionEditor::new(document, options, move |html| {
            written.set(html.len());
            if let Some(path) = &target {
                if let Err(e) = std::fs::write(path, &html) {
                    error!("Failed to write {}: {e}", path.display());
                }
            }
        });

        Self {
            editor,
            config,
            mode: Mode::Editing,
            output_path,
            output_bytes,
        }
    }

    fn selection(&self) -> Selection {
        self.editor.editor().read(|state| state.selection.clone())
    }

    fn leaf_len(&self, leaf: usize) -> usize {
        self.editor
            .editor()
            .read(|state| state.document.leaf_len(leaf).unwrap_or(0))
    }

    fn leaf_count(&self) -> usize {
        self.editor
            .editor()
            .read(|state| state.document.leaf_count())
    }

    /// Move the focus point; the anchor follows unless extending
    fn move_focus(&mut self, focus: Point, extend: bool) {
        let selection = self.selection();
        let next = if extend {
            Selection::range(selection.anchor, focus)
        } else {
            Selection::caret(focus.leaf, focus.offset)
        };
        if let Err(e) = self.editor.select(next) {
            error!("Failed to move caret: {e}");
        }
    }

    fn step(&self, key: KeyCode) -> Point {
        let focus = self.selection().focus;
        let last = self.leaf_count().saturating_sub(1);
        match key {
            KeyCode::Left if focus.offset > 0 => Point::new(focus.leaf, focus.offset - 1),
            KeyCode::Left if focus.leaf > 0 => {
                Point::new(focus.leaf - 1, self.leaf_len(focus.leaf - 1))
            }
            KeyCode::Right if focus.offset < self.leaf_len(focus.leaf) => {
                Point::new(focus.leaf, focus.offset + 1)
            }
            KeyCode::Right if focus.leaf < last => Point::new(focus.leaf + 1, 0),
            KeyCode::Up if focus.leaf > 0 => Point::new(
                focus.leaf - 1,
                focus.offset.min(self.leaf_len(focus.leaf - 1)),
            ),
            KeyCode::Down if focus.leaf < last => Point::new(
                focus.leaf + 1,
                focus.offset.min(self.leaf_len(focus.leaf + 1)),
            ),
            KeyCode::Home => Point::new(focus.leaf, 0),
            KeyCode::End => Point::new(focus.leaf, self.leaf_len(focus.leaf)),
            _ => focus,
        }
    }

    fn command(&mut self, cmd: Cmd) {
        if let Err(e) = self.editor.command(cmd) {
            self.mode = Mode::Alert(e.to_string());
        }
    }

    fn perform(&mut self, action: ToolbarAction, answer: Option<String>) {
        let mut prompt = OverlayPrompt::answering(answer);
        let outcome = self.editor.perform(action, &mut prompt);
        if let Some(alert) = prompt.alerts.pop() {
            self.mode = Mode::Alert(alert);
        } else if let DispatchOutcome::Rejected(reason) = outcome {
            self.mode = Mode::Alert(reason.to_string());
        }
    }

    fn cycle(options: &[FontOption], current: Option<&str>, default: &str) -> Option<String> {
        let current = current.unwrap_or(default);
        let index = options.iter().position(|o| o.value == current);
        let next = index.map_or(0, |i| (i + 1) % options.len());
        options.get(next).map(|o| o.value.clone())
    }

    /// Handle a key; returns false to quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match &mut self.mode {
            Mode::Alert(_) => {
                self.mode = Mode::Editing;
                return true;
            }
            Mode::Prompt { action, input } => {
                match key.code {
                    KeyCode::Enter => {
                        let answer = std::mem::take(input);
                        let action = *action;
                        self.mode = Mode::Editing;
                        self.run_pending(action, Some(answer));
                    }
                    KeyCode::Esc => {
                        let action = *action;
                        self.mode = Mode::Editing;
                        self.run_pending(action, None);
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Char(c) => input.push(c),
                    _ => {}
                }
                return true;
            }
            Mode::Editing => {}
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('q') if ctrl => return false,
            KeyCode::Char('b') if ctrl => {
                self.perform(ToolbarAction::ToggleFormat(TextFormat::Bold), None)
            }
            KeyCode::Char('t') if ctrl => {
                self.perform(ToolbarAction::ToggleFormat(TextFormat::Italic), None)
            }
            KeyCode::Char('u') if ctrl => {
                self.perform(ToolbarAction::ToggleFormat(TextFormat::Underline), None)
            }
            KeyCode::Char('x') if ctrl => {
                self.perform(ToolbarAction::ToggleFormat(TextFormat::Strikethrough), None)
            }
            KeyCode::Char('e') if ctrl => {
                self.perform(ToolbarAction::ToggleFormat(TextFormat::Code), None)
            }
            KeyCode::Char('k') if ctrl => {
                if self.editor.toolbar().is_link {
                    self.run_pending(PendingAction::Link, None);
                } else {
                    self.mode = Mode::Prompt {
                        action: PendingAction::Link,
                        input: String::new(),
                    };
                }
            }
            KeyCode::Char('y') if ctrl => {
                self.mode = Mode::Prompt {
                    action: PendingAction::Embed,
                    input: String::new(),
                }
            }
            KeyCode::Char('z') if ctrl => self.perform(ToolbarAction::Undo, None),
            KeyCode::Char('r') if ctrl => self.perform(ToolbarAction::Redo, None),
            KeyCode::Char(c) if alt => self.handle_alt(c),
            KeyCode::Char(c) if !ctrl => self.command(Cmd::InsertText(c.to_string())),
            KeyCode::Enter => self.command(Cmd::SplitBlock),
            KeyCode::Backspace => self.command(Cmd::DeleteBackward),
            code @ (KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Home
            | KeyCode::End) => {
                let focus = self.step(code);
                self.move_focus(focus, shift);
            }
            _ => {}
        }
        true
    }

    fn handle_alt(&mut self, c: char) {
        let block = |block_type| ToolbarAction::SetBlockType(block_type);
        let action = match c {
            '0' => block(BlockType::Paragraph),
            '1'..='6' => match HeadingLevel::try_from(c as u8 - b'0') {
                Ok(level) => block(BlockType::Heading(level)),
                Err(_) => return,
            },
            'q' => block(BlockType::Quote),
            'u' => block(BlockType::List(ListKind::Unordered)),
            'o' => block(BlockType::List(ListKind::Ordered)),
            'l' => ToolbarAction::SetAlignment(Alignment::Left),
            'c' => ToolbarAction::SetAlignment(Alignment::Center),
            'r' => ToolbarAction::SetAlignment(Alignment::Right),
            'j' => ToolbarAction::SetAlignment(Alignment::Justify),
            'f' => {
                let toolbar = self.editor.toolbar();
                let fonts = &self.config.fonts;
                match Self::cycle(&fonts.families, toolbar.font_family.as_deref(), &fonts.default_family) {
                    Some(family) => ToolbarAction::SetFontFamily(family),
                    None => return,
                }
            }
            's' => {
                let toolbar = self.editor.toolbar();
                let fonts = &self.config.fonts;
                match Self::cycle(&fonts.sizes, toolbar.font_size.as_deref(), &fonts.default_size) {
                    Some(size) => ToolbarAction::SetFontSize(size),
                    None => return,
                }
            }
            _ => return,
        };
        self.perform(action, None);
    }

    fn run_pending(&mut self, action: PendingAction, answer: Option<String>) {
        let action = match action {
            PendingAction::Link => ToolbarAction::ToggleLink {
                no_follow: self.config.links.no_follow,
            },
            PendingAction::Embed => ToolbarAction::InsertEmbed,
        };
        self.perform(action, answer);
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!(
                "Usage: {} [INPUT.md] [--output PATH] [--init-config]",
                args[0]
            );
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };

    if parsed.init_config {
        let config_path = Config::config_path();
        config
            .save()
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        println!("Wrote config to {}", config_path.display());
        return Ok(());
    }

    init_logging()?;

    let document = match &parsed.input {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Document::from_markdown(&source)
        }
        None => Document::new(),
    };
    let output_path = parsed.output.or_else(|| config.output_path.clone());
    info!(
        "Starting editor: input={:?} output={:?}",
        parsed.input, output_path
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(document, config, output_path);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Log to a file so output does not corrupt the terminal UI
fn init_logging() -> Result<()> {
    let log_path = env::temp_dir().join("catalog-editor.log");
    let file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file {}", log_path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn toolbar_line(toolbar: &ToolbarState, config: &Config) -> Line<'static> {
    let on = Style::default().fg(Color::Black).bg(Color::Yellow);
    let off = Style::default().fg(Color::Gray);
    let flag = |label: &'static str, active: bool| Span::styled(label, if active { on } else { off });

    let fonts = &config.fonts;
    let family = toolbar
        .font_family
        .clone()
        .unwrap_or_else(|| fonts.default_family.clone());
    let size = toolbar
        .font_size
        .clone()
        .unwrap_or_else(|| fonts.default_size.clone());
    let families: Vec<(&str, &str)> = fonts
        .families
        .iter()
        .map(|o| (o.label.as_str(), o.value.as_str()))
        .collect();
    let sizes: Vec<(&str, &str)> = fonts
        .sizes
        .iter()
        .map(|o| (o.label.as_str(), o.value.as_str()))
        .collect();

    Line::from(vec![
        flag(" ↶ ", toolbar.can_undo),
        flag(" ↷ ", toolbar.can_redo),
        Span::raw(" │ "),
        Span::styled(
            format!("[{}]", toolbar.block_type.label()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        flag(" B ", toolbar.is_active(TextFormat::Bold)),
        flag(" I ", toolbar.is_active(TextFormat::Italic)),
        flag(" U ", toolbar.is_active(TextFormat::Underline)),
        flag(" S ", toolbar.is_active(TextFormat::Strikethrough)),
        flag(" <> ", toolbar.is_active(TextFormat::Code)),
        flag(" Link ", toolbar.is_link),
        Span::raw(" │ "),
        Span::raw(format!("{} ", label_for(&families, &family))),
        Span::raw(format!("{} ", label_for(&sizes, &size))),
        Span::raw(format!("│ align: {}", toolbar.alignment.as_css())),
    ])
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let toolbar = app.editor.toolbar();
    let toolbar_widget = Paragraph::new(toolbar_line(&toolbar, &app.config))
        .block(Block::default().borders(Borders::ALL).title("Toolbar"));
    f.render_widget(toolbar_widget, chunks[0]);

    let inner_width = chunks[1].width.saturating_sub(2);
    let view = app
        .editor
        .editor()
        .read(|state| render::render_document(state, inner_width, PLACEHOLDER));
    let title = match &app.output_path {
        Some(path) => format!(
            "Description → {} ({} bytes)",
            path.display(),
            app.output_bytes.get()
        ),
        None => format!("Description ({} bytes of HTML)", app.output_bytes.get()),
    };
    let content = Paragraph::new(view.lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(content, chunks[1]);

    let help = Paragraph::new(Line::from(
        "^Q quit │ ^B ^T ^U ^X ^E format │ ^K link │ ^Y video │ ^Z/^R undo/redo │ \
         Alt+0-6 block │ Alt+Q quote │ Alt+U/O list │ Alt+L/C/R/J align │ Alt+F/S font",
    ))
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);

    match &app.mode {
        Mode::Editing => {
            if let Some((x, y)) = view.caret {
                let area = chunks[1];
                let y = area.y + 1 + y;
                if y < area.y + area.height.saturating_sub(1) {
                    f.set_cursor_position((area.x + 1 + x.min(inner_width), y));
                }
            }
        }
        Mode::Prompt { action, input } => {
            let message = match action {
                PendingAction::Link => LINK_PROMPT,
                PendingAction::Embed => EMBED_PROMPT,
            };
            let area = popup_area(f.area(), 60, 3);
            f.render_widget(Clear, area);
            f.render_widget(
                Paragraph::new(input.as_str())
                    .block(Block::default().borders(Borders::ALL).title(message)),
                area,
            );
            f.set_cursor_position((area.x + 1 + input.chars().count() as u16, area.y + 1));
        }
        Mode::Alert(message) => {
            let area = popup_area(f.area(), 60, 4);
            f.render_widget(Clear, area);
            f.render_widget(
                Paragraph::new(message.as_str())
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(Color::Red))
                    .block(Block::default().borders(Borders::ALL).title("Alert (any key)")),
                area,
            );
        }
    }
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
