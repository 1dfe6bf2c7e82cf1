use crate::core::FeatureRow;
use crate::error::{PipelineError, PipelineResult};
use crate::sink::Sink;
use crossbeam_channel::{bounded, Receiver, SendError, Sender};
use log::{debug, error, warn};
use std::thread::{self, JoinHandle};

/// Message accepted by an aggregator's inbound queue
#[derive(Debug)]
pub enum AggregatorMessage {
    /// A completed feature row
    Row(FeatureRow),
    /// No more rows will follow
    EndOfStream,
}

/// Producer half handed to segment workers
#[derive(Debug, Clone)]
pub struct RowSender {
    sender: Sender<AggregatorMessage>,
}

impl RowSender {
    /// Queue a row, blocking while the queue is full
    pub fn send(&self, row: FeatureRow) -> PipelineResult<()> {
        self.sender
            .send(AggregatorMessage::Row(row))
            .map_err(|SendError(_)| PipelineError::SinkError("aggregator has stopped".to_string()))
    }
}

/// Single consumer that owns one file's sink.
///
/// Rows are written in arrival order. The consumer stops on
/// `EndOfStream`, which `finish` sends only after every producer is done.
pub struct Aggregator {
    sender: Sender<AggregatorMessage>,
    consumer: JoinHandle<PipelineResult<u64>>,
    name: String,
}

impl Aggregator {
    /// Start the consumer thread for `sink` behind a queue of `capacity` rows
    pub fn spawn<S: Into<String>>(
        sink: Box<dyn Sink>,
        capacity: usize,
        name: S,
    ) -> PipelineResult<Self> {
        let name = name.into();
        let (sender, receiver) = bounded(capacity.max(1));

        let consumer_name = name.clone();
        let consumer = thread::Builder::new()
            .name(format!("aggregator:{name}"))
            .spawn(move || consume(receiver, sink, &consumer_name))
            .map_err(|e| PipelineError::Worker(format!("cannot start aggregator: {e}")))?;

        Ok(Aggregator {
            sender,
            consumer,
            name,
        })
    }

    /// Producer handle for one worker
    pub fn sender(&self) -> RowSender {
        RowSender {
            sender: self.sender.clone(),
        }
    }

    /// Signal end of stream and wait for the sink to be closed.
    ///
    /// Returns the number of rows written.
    pub fn finish(self) -> PipelineResult<u64> {
        if self.sender.send(AggregatorMessage::EndOfStream).is_err() {
            debug!("aggregator {} stopped before end of stream", self.name);
        }
        drop(self.sender);

        self.consumer.join().map_err(|_| {
            PipelineError::Worker(format!("aggregator {} panicked", self.name))
        })?
    }
}

fn consume(
    receiver: Receiver<AggregatorMessage>,
    mut sink: Box<dyn Sink>,
    name: &str,
) -> PipelineResult<u64> {
    let mut written = 0u64;
    let mut failure: Option<PipelineError> = None;
    let mut discarded = 0u64;

    loop {
        match receiver.recv() {
            Ok(AggregatorMessage::Row(row)) => {
                if failure.is_some() {
                    // Keep draining so producers never block on a dead sink
                    discarded += 1;
                    continue;
                }
                match sink.write_row(&row) {
                    Ok(()) => written += 1,
                    Err(e) => {
                        error!("file={} sink write failed: {}", name, e);
                        discarded += 1;
                        failure = Some(e);
                    }
                }
            }
            Ok(AggregatorMessage::EndOfStream) => break,
            Err(_) => {
                warn!("file={} all producers left without end of stream", name);
                return Err(PipelineError::SinkError(format!(
                    "{name}: stream closed without end of stream"
                )));
            }
        }
    }

    if let Some(e) = failure {
        warn!("file={} discarded {} rows after sink failure", name, discarded);
        return Err(e);
    }

    sink.finalize()?;
    Ok(written)
}
