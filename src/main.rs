use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, enable_raw_mode},
};
use log::{error, info};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::Line,
    widgets::Paragraph,
};
use simplelog::{Config, LevelFilter, WriteLogger};

use versemark::chapter::Book;
use versemark::overlay;
use versemark::panic_handler;
use versemark::reader::ChapterReader;
use versemark::store::HighlightStore;
use versemark::theme;

#[derive(Parser)]
#[command(name = "versemark", about = "Terminal Bible reader with word-level highlights")]
struct Cli {
    /// Path to a book JSON file (id, title, chapters with numbered verses)
    book: PathBuf,

    /// Chapter to open
    #[arg(long, default_value_t = 1)]
    chapter: u32,

    /// Directory for highlight files (defaults to VERSEMARK_HIGHLIGHTS_DIR
    /// or ./.versemark_highlights)
    #[arg(long)]
    highlights_dir: Option<PathBuf>,

    /// Font size forwarded into the build key; has no effect on terminal
    /// glyphs
    #[arg(long, default_value_t = 16)]
    font_size: u16,
}

struct App {
    book: Book,
    chapter_idx: usize,
    reader: ChapterReader,
    store: HighlightStore,
    font_size: u16,
    status: Option<String>,
}

impl App {
    fn new(cli: &Cli) -> Result<Self> {
        let book = Book::load(&cli.book)?;
        let store = HighlightStore::open(&book.id, cli.highlights_dir.as_deref())?;

        let chapter_idx = book
            .chapters
            .iter()
            .position(|c| c.number == cli.chapter)
            .unwrap_or(0);
        let chapter = book
            .chapters
            .get(chapter_idx)
            .context("Book has no chapters")?;

        let highlights: Vec<_> = store
            .chapter_highlights(&book.id, chapter.number)
            .into_iter()
            .cloned()
            .collect();
        let reader = ChapterReader::new(
            &book.id,
            chapter,
            cli.font_size,
            &highlights,
            theme::current_theme(),
        );

        Ok(Self {
            book,
            chapter_idx,
            reader,
            store,
            font_size: cli.font_size,
            status: None,
        })
    }

    fn sync_reader(&mut self) {
        let chapter = &self.book.chapters[self.chapter_idx];
        let highlights: Vec<_> = self
            .store
            .chapter_highlights(&self.book.id, chapter.number)
            .into_iter()
            .cloned()
            .collect();
        self.reader
            .rebuild_if_needed(chapter, self.font_size, &highlights, theme::current_theme());
    }

    fn go_to_chapter(&mut self, idx: usize) {
        if idx >= self.book.chapters.len() {
            return;
        }
        self.chapter_idx = idx;
        self.reader.scroll_offset = 0;
        self.reader.selection.clear_selection();
        self.sync_reader();
    }

    fn commit_highlight(&mut self) {
        let Some(highlight) = self.reader.commit_highlight() else {
            self.status = Some("Nothing selected".to_string());
            return;
        };
        let reference = highlight.range.to_string();
        match self.store.add(highlight) {
            Ok(()) => self.status = Some(format!("Highlighted {reference}")),
            Err(e) => {
                error!("Failed to save highlight: {e:#}");
                self.status = Some("Failed to save highlight".to_string());
            }
        }
        self.sync_reader();
    }

    fn delete_under_cursor(&mut self) {
        let chapter_number = self.reader.chapter_number();
        let Some(pos) = self.reader.position_under_cursor() else {
            return;
        };
        let highlights: Vec<_> = self
            .store
            .chapter_highlights(&self.book.id, chapter_number)
            .into_iter()
            .cloned()
            .collect();
        let Some(hit) = overlay::highlight_at(pos, &self.book.id, chapter_number, &highlights)
        else {
            self.status = Some("No highlight here".to_string());
            return;
        };
        let reference = hit.range.to_string();
        match self.store.delete(hit.id) {
            Ok(()) => self.status = Some(format!("Removed highlight {reference}")),
            Err(e) => {
                error!("Failed to delete highlight: {e:#}");
                self.status = Some("Failed to delete highlight".to_string());
            }
        }
        self.sync_reader();
    }

    fn draw(&mut self, f: &mut ratatui::Frame) {
        let palette = theme::current_theme();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(f.area());

        let chapter = &self.book.chapters[self.chapter_idx];
        let title = format!("{} {}", self.book.title, chapter.number);
        self.reader.render(f, chunks[0], palette, &title);

        let selection = self
            .reader
            .current_span()
            .map(|s| s.to_verse_range().to_string());
        let status = match (&self.status, selection) {
            (Some(msg), _) => msg.clone(),
            (None, Some(reference)) => format!("Selected {reference}"),
            (None, None) => format!(
                "color: {} | drag: select  h: highlight  d: delete  c: color  t: theme  n/p: chapter  q: quit",
                self.reader.active_color
            ),
        };
        let bar = Paragraph::new(Line::from(status))
            .style(Style::default().fg(palette.base_04).bg(palette.base_01));
        f.render_widget(bar, chunks[1]);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create("versemark.log")?,
    )?;
    info!("Starting versemark");

    panic_handler::initialize_panic_handler();

    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli)?;
    let res = run_app(&mut terminal, &mut app);

    panic_handler::restore_terminal();

    if let Err(err) = res {
        error!("Application error: {err:?}");
        println!("{err:?}");
    }

    info!("Shutting down versemark");
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    let tick_rate = Duration::from_millis(50);

    loop {
        terminal.draw(|f| app.draw(f))?;

        if !event::poll(tick_rate)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.status = None;
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('j') | KeyCode::Down => app.reader.scroll_down(),
                    KeyCode::Char('k') | KeyCode::Up => app.reader.scroll_up(),
                    KeyCode::Char('n') => app.go_to_chapter(app.chapter_idx + 1),
                    KeyCode::Char('p') => {
                        app.go_to_chapter(app.chapter_idx.saturating_sub(1));
                    }
                    KeyCode::Char('h') => app.commit_highlight(),
                    KeyCode::Char('d') => app.delete_under_cursor(),
                    KeyCode::Char('c') => {
                        app.reader.active_color = app.reader.active_color.next();
                    }
                    KeyCode::Char('t') => {
                        theme::toggle_theme();
                        app.reader.invalidate();
                        app.sync_reader();
                    }
                    KeyCode::Esc => app.reader.selection.clear_selection(),
                    _ => {}
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    app.status = None;
                    app.reader.handle_mouse_down(mouse.column, mouse.row);
                }
                MouseEventKind::Drag(MouseButton::Left) => {
                    app.reader.handle_mouse_drag(mouse.column, mouse.row);
                }
                MouseEventKind::Up(MouseButton::Left) => {
                    app.reader.handle_mouse_up(mouse.column, mouse.row);
                }
                MouseEventKind::ScrollDown => app.reader.scroll_down(),
                MouseEventKind::ScrollUp => app.reader.scroll_up(),
                _ => {}
            },
            _ => {}
        }
    }
}
