use std::io::{self, Write};
use std::path::Path;

use hemicycle_crawler::{CleanedRecord, Publish};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ArgEnum)]
pub enum OutputFormat {
    Csv,
    Jsonl,
}

/// Local publisher writing one row or line per record.
pub enum RecordWriter<W: Write> {
    Csv(csv::Writer<W>),
    JsonLines(W),
}

impl RecordWriter<Box<dyn Write>> {
    /// Writes to `path`, or to stdout when there is none.
    pub fn open(format: OutputFormat, path: Option<&Path>) -> anyhow::Result<Self> {
        let wtr: Box<dyn Write> = match path {
            Some(path) => Box::new(io::BufWriter::new(fs_err::File::create(path)?)),
            None => Box::new(io::stdout()),
        };
        Ok(Self::new(format, wtr))
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(format: OutputFormat, wtr: W) -> Self {
        match format {
            OutputFormat::Csv => Self::Csv(csv::Writer::from_writer(wtr)),
            OutputFormat::Jsonl => Self::JsonLines(wtr),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Csv(wtr) => wtr.flush(),
            Self::JsonLines(wtr) => wtr.flush(),
        }
    }

    pub fn into_inner(self) -> anyhow::Result<W> {
        match self {
            Self::Csv(wtr) => wtr.into_inner().map_err(|e| anyhow::anyhow!("{}", e.error())),
            Self::JsonLines(wtr) => Ok(wtr),
        }
    }
}

impl<W: Write> Publish for RecordWriter<W> {
    fn publish(&mut self, records: &[CleanedRecord]) -> anyhow::Result<()> {
        for record in records {
            match self {
                Self::Csv(wtr) => wtr.serialize(record)?,
                Self::JsonLines(wtr) => {
                    serde_json::to_writer(&mut *wtr, record)?;
                    wtr.write_all(b"\n")?;
                }
            }
        }
        self.flush()?;
        log::info!("Published {} records", records.len());
        Ok(())
    }
}
