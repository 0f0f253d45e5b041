use std::io::{self, BufRead, BufReader, StdinLock, Stdout, Write};
use std::net::{TcpStream, ToSocketAddrs};

use cycles::{ClientMessage, Direction, GameState, ServerMessage};
use tracing::{debug, trace};

use crate::Connection;

/// A [`Connection`] speaking newline-delimited JSON over any reader/writer pair.
pub struct JsonLinesConnection<R, W> {
    reader: R,
    writer: W,
    active: bool,
    // A re-usable buffer for reading lines.
    buf: String,
}

impl JsonLinesConnection<BufReader<TcpStream>, TcpStream> {
    /// Connects to a server listening at `address`.
    pub fn tcp(address: impl ToSocketAddrs) -> io::Result<Self> {
        let stream = TcpStream::connect(address)?;
        // Moves are tiny and the server waits for them
        stream.set_nodelay(true)?;
        debug!(peer = %stream.peer_addr()?, "Connected");
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self::new(reader, stream))
    }
}

impl JsonLinesConnection<StdinLock<'static>, Stdout> {
    /// Communicates through stdin/stdout. Stderr stays free for logging.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> JsonLinesConnection<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            active: false,
            buf: String::new(),
        }
    }

    /// Consumes the connection, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn send(&mut self, msg: &ClientMessage) -> io::Result<()> {
        let mut json = serde_json::to_string(msg)?;
        trace!(line = %json, "Sending");
        json.push('\n');
        self.writer.write_all(json.as_bytes())?;
        self.writer.flush()
    }

    fn receive(&mut self) -> io::Result<Option<ServerMessage>> {
        self.buf.clear(); // because read_line() appends to the buffer
        let num_bytes_read = self.reader.read_line(&mut self.buf)?;
        if num_bytes_read == 0 {
            // 0 bytes read means EOF - the server has hung up.
            return Ok(None);
        }
        let line = self.buf.trim_end();
        trace!(%line, "Received");
        Ok(Some(serde_json::from_str(line)?))
    }
}

impl<R: BufRead, W: Write> Connection for JsonLinesConnection<R, W> {
    fn connect(&mut self, name: &str) -> io::Result<()> {
        self.send(&ClientMessage::Join {
            name: String::from(name),
        })?;
        self.active = true;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn receive_game_state(&mut self) -> io::Result<Option<GameState>> {
        match self.receive() {
            Ok(Some(ServerMessage::GameState(state))) => Ok(Some(state)),
            Ok(Some(ServerMessage::Bye)) | Ok(None) => {
                debug!("Round is over");
                self.active = false;
                Ok(None)
            }
            Err(err) => {
                self.active = false;
                Err(err)
            }
        }
    }

    fn send_move(&mut self, direction: Direction) -> io::Result<()> {
        let result = self.send(&ClientMessage::Move { direction });
        if result.is_err() {
            self.active = false;
        }
        result
    }
}
