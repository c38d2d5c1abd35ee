use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("channel closed by peer")]
    Closed,
}

/// Half-duplex message transport to the decision process. Both calls may block.
pub trait Channel {
    fn send(&mut self, message: &str) -> Result<(), ChannelError>;
    fn receive(&mut self) -> Result<String, ChannelError>;
}

/// File hand-off through a single path, normally a named pipe created with
/// `mkfifo`. Every message opens the path afresh: write-then-close for
/// outbound, open-then-read-one-line for inbound.
#[derive(Debug, Clone)]
pub struct PipeChannel {
    path: PathBuf,
}

impl PipeChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Channel for PipeChannel {
    fn send(&mut self, message: &str) -> Result<(), ChannelError> {
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        file.write_all(message.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn receive(&mut self) -> Result<String, ChannelError> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        let mut line = String::new();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            return Err(ChannelError::Closed);
        }
        Ok(line)
    }
}

/// Line-oriented transport over any reader/writer pair, e.g. stdin/stdout.
pub struct StreamChannel<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> StreamChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl StreamChannel<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Channel for StreamChannel<R, W> {
    fn send(&mut self, message: &str) -> Result<(), ChannelError> {
        writeln!(self.writer, "{}", message)?;
        self.writer.flush()?;
        Ok(())
    }

    fn receive(&mut self) -> Result<String, ChannelError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ChannelError::Closed);
        }
        Ok(line)
    }
}

/// Scripted in-memory transport: replies are queued up front and every sent
/// message is recorded.
#[derive(Debug, Default, Clone)]
pub struct MemoryChannel {
    inbound: VecDeque<String>,
    outbound: Vec<String>,
}

impl MemoryChannel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inbound: replies.into_iter().map(Into::into).collect(),
            outbound: Vec::new(),
        }
    }

    pub fn sent(&self) -> &[String] {
        &self.outbound
    }

    pub fn pending(&self) -> usize {
        self.inbound.len()
    }
}

impl Channel for MemoryChannel {
    fn send(&mut self, message: &str) -> Result<(), ChannelError> {
        self.outbound.push(message.to_string());
        Ok(())
    }

    fn receive(&mut self) -> Result<String, ChannelError> {
        self.inbound.pop_front().ok_or(ChannelError::Closed)
    }
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn send(&mut self, message: &str) -> Result<(), ChannelError> {
        (**self).send(message)
    }

    fn receive(&mut self) -> Result<String, ChannelError> {
        (**self).receive()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use super::*;

    #[test]
    fn memory_channel_replays_in_order() {
        let mut channel = MemoryChannel::new(["[fwd]", "[end]"]);
        channel.send("first").unwrap();
        assert_eq!(channel.receive().unwrap(), "[fwd]");
        assert_eq!(channel.receive().unwrap(), "[end]");
        assert!(matches!(channel.receive(), Err(ChannelError::Closed)));
        assert_eq!(channel.sent(), ["first".to_string()]);
    }

    #[test]
    fn stream_channel_is_line_oriented() {
        let input = Cursor::new("[fwd].\n[end]\n");
        let mut channel = StreamChannel::new(input, Vec::new());
        channel.send("[sensor(cell,base)].").unwrap();
        assert_eq!(channel.receive().unwrap(), "[fwd].\n");
        assert_eq!(channel.receive().unwrap(), "[end]\n");
        assert!(matches!(channel.receive(), Err(ChannelError::Closed)));

        let (_, written) = channel.into_parts();
        assert_eq!(String::from_utf8(written).unwrap(), "[sensor(cell,base)].\n");
    }

    #[test]
    fn pipe_channel_over_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tube");
        fs::write(&path, "").unwrap();
        let mut channel = PipeChannel::new(&path);

        channel.send("[sensor(cell,base)].").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[sensor(cell,base)].");

        fs::write(&path, "[turnR,fwd].\nignored\n").unwrap();
        assert_eq!(channel.receive().unwrap(), "[turnR,fwd].\n");

        fs::write(&path, "").unwrap();
        assert!(matches!(channel.receive(), Err(ChannelError::Closed)));
    }

    #[test]
    fn pipe_channel_reports_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut channel = PipeChannel::new(dir.path().join("absent"));
        assert!(matches!(channel.receive(), Err(ChannelError::Io(_))));
        assert!(matches!(channel.send("x"), Err(ChannelError::Io(_))));
    }
}
