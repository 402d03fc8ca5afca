//! Event hub: multiplexes terminal, listing watcher, detail completions and
//! tick events into a single async channel.

use std::path::{Path, PathBuf};

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use tokio::sync::mpsc;

use hangry_dashboard::panel::DetailLoaded;

#[derive(Debug)]
pub enum Event {
    /// Terminal key press
    Key(KeyEvent),
    /// Mouse event
    Mouse(MouseEvent),
    /// Terminal resized
    #[allow(dead_code)]
    Resize(u16, u16),
    /// The listing file changed on disk
    ListingChanged(Vec<PathBuf>),
    /// A detail fetch finished
    DetailLoaded(DetailLoaded),
    /// Periodic tick (1 second)
    Tick,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(
        listing_path: PathBuf,
        watch_enabled: bool,
        mut detail_rx: mpsc::UnboundedReceiver<DetailLoaded>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // Spawn crossterm event reader
        let tx_key = tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            while let Some(Ok(evt)) = reader.next().await {
                let forwarded = match evt {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
                    CrosstermEvent::Mouse(mouse) => Event::Mouse(mouse),
                    CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                    _ => continue,
                };
                if tx_key.send(forwarded).is_err() {
                    break;
                }
            }
        });

        // Forward detail completions
        let tx_detail = tx.clone();
        tokio::spawn(async move {
            while let Some(loaded) = detail_rx.recv().await {
                if tx_detail.send(Event::DetailLoaded(loaded)).is_err() {
                    break;
                }
            }
        });

        // Spawn tick timer
        let tx_tick = tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
            loop {
                interval.tick().await;
                if tx_tick.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        // Spawn listing watcher (if enabled)
        if watch_enabled {
            let tx_watch = tx.clone();
            tokio::spawn(async move {
                if let Err(e) = run_listing_watcher(listing_path, tx_watch).await {
                    tracing::error!(error = %e, "listing watcher failed");
                }
            });
        }

        EventHandler { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

async fn run_listing_watcher(
    listing_path: PathBuf,
    tx: mpsc::UnboundedSender<Event>,
) -> color_eyre::Result<()> {
    let (wtx, mut wrx) = mpsc::channel::<Vec<PathBuf>>(100);

    let watched = listing_path.clone();
    let mut debouncer = notify_debouncer_mini::new_debouncer(
        std::time::Duration::from_millis(300),
        move |result: notify_debouncer_mini::DebounceEventResult| {
            if let Ok(events) = result {
                let paths: Vec<_> = events
                    .iter()
                    .filter(|e| is_listing_file(&e.path, &watched))
                    .map(|e| e.path.clone())
                    .collect();
                if !paths.is_empty() {
                    let _ = wtx.blocking_send(paths);
                }
            }
        },
    )?;

    // Watch the directory: editors often replace the file instead of writing it
    let dir = match listing_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    debouncer
        .watcher()
        .watch(&dir, notify::RecursiveMode::NonRecursive)?;

    // Keep debouncer alive; forward events
    while let Some(paths) = wrx.recv().await {
        if tx.send(Event::ListingChanged(paths)).is_err() {
            break;
        }
    }

    Ok(())
}

fn is_listing_file(path: &Path, listing_path: &Path) -> bool {
    match (path.file_name(), listing_path.file_name()) {
        (Some(changed), Some(listing)) => changed == listing,
        _ => false,
    }
}
