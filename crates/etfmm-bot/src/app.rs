//! Main application orchestration.
//!
//! Bridges the engine to the connectivity layer over standard streams:
//! - A reader task decodes one `ExchangeEvent` per input line
//! - Events reach the engine through a single mpsc channel, in order
//! - Commands go out as one JSON `OrderCommand` per output line
//! - Periodic and final session summaries

use crate::config::AppConfig;
use crate::error::AppResult;
use etfmm_core::{ExchangeEvent, OrderCommand};
use etfmm_feed::EventParser;
use etfmm_mm::MarketMaker;
use etfmm_telemetry::SessionStatsReporter;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    engine: MarketMaker,
    stats: SessionStatsReporter,
}

impl Application {
    /// Create a new application from validated settings.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let engine = MarketMaker::new(config.quoter.clone());
        Ok(Self {
            config,
            engine,
            stats: SessionStatsReporter::new(),
        })
    }

    pub fn engine(&self) -> &MarketMaker {
        &self.engine
    }

    /// Run on the process's stdin and stdout until EOF or Ctrl-C.
    pub async fn run(self) -> AppResult<()> {
        let mut stdout = tokio::io::stdout();
        self.run_with(tokio::io::stdin(), &mut stdout).await?;
        Ok(())
    }

    /// Run on arbitrary streams. Returns the engine once input is exhausted
    /// or a shutdown signal arrives.
    pub async fn run_with<R, W>(mut self, input: R, output: &mut W) -> AppResult<MarketMaker>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin,
    {
        info!(
            mode = %self.config.quoter.pricing_mode,
            channel_capacity = self.config.event_channel_capacity,
            "Starting application"
        );

        let (event_tx, mut event_rx) =
            mpsc::channel::<ExchangeEvent>(self.config.event_channel_capacity);
        let reader_handle = tokio::spawn(read_events(input, event_tx));

        let period = Duration::from_secs(self.config.stats_interval_secs);
        let mut stats_interval = interval_at(Instant::now() + period, period);

        info!("Entering main event loop");
        let mut event_count = 0u64;
        let mut command_count = 0u64;

        loop {
            tokio::select! {
                maybe_event = event_rx.recv() => {
                    let Some(event) = maybe_event else {
                        info!("Event stream closed");
                        break;
                    };
                    event_count += 1;
                    let kind = event.kind();
                    let commands = self.engine.handle(event);
                    if !commands.is_empty() {
                        debug!(kind, commands = commands.len(), "Event produced commands");
                        command_count += commands.len() as u64;
                        write_commands(output, &commands).await?;
                    }
                }

                _ = stats_interval.tick() => {
                    info!("Outputting periodic statistics summary");
                    self.stats.output_summary();
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!(event_count, command_count, "Shutting down");
        reader_handle.abort();
        output.flush().await?;

        info!("Final statistics summary:");
        self.stats.output_summary();

        Ok(self.engine)
    }
}

/// Decode input lines and forward events until EOF or the receiver closes.
async fn read_events<R>(input: R, event_tx: mpsc::Sender<ExchangeEvent>)
where
    R: AsyncRead + Unpin,
{
    let parser = EventParser::new();
    let mut lines = BufReader::new(input).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parser.parse_line(&line) {
                Ok(Some(event)) => {
                    if event_tx.send(event).await.is_err() {
                        debug!("Event receiver dropped");
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Skipping malformed event line"),
            },
            Ok(None) => break,
            Err(e) => {
                error!(?e, "Failed to read event stream");
                break;
            }
        }
    }

    info!(
        parsed = parser.stats().parsed(),
        rejected = parser.stats().rejected(),
        "Event reader finished"
    );
}

/// Write commands as newline-delimited JSON and flush.
async fn write_commands<W>(output: &mut W, commands: &[OrderCommand]) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(commands.len() * 96);
    for command in commands {
        serde_json::to_writer(&mut buf, command)?;
        buf.push(b'\n');
    }
    output.write_all(&buf).await?;
    output.flush().await?;
    Ok(())
}
