use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::dictionary::Dictionary;
use crate::error::{JoyError, JoyResult};
use crate::stack::OperandStack;
use crate::value::FileHandle;

/// The four process-wide toggles named in the runtime-control surface:
/// whether input/output is echoed, whether the top of stack auto-prints
/// after a top-level line, whether an undefined symbol is tolerated rather
/// than fatal, and whether dispatch is traced to the log facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeFlags {
    pub echo: bool,
    pub autoput: bool,
    pub undeferror: bool,
    pub trace: bool,
}

/// A stream a `File` value can refer to. `Std{in,out,err}` are handles to
/// the process's own standard streams; `Real` wraps an opened OS file.
enum FileEntry {
    Stdin,
    Stdout,
    Stderr,
    Real(File),
}

/// The registry backing [`crate::value::FileHandle`]. Handles are small
/// integer keys into this arena rather than raw `File` values on the stack:
/// a real file descriptor is externally lifetimed, non-owning state, and an
/// index/arena keeps that lifetime out of `Value` entirely.
#[derive(Default)]
pub struct Files {
    next: u64,
    entries: HashMap<u64, FileEntry>,
}

impl Files {
    fn new() -> Self {
        let mut files = Self {
            next: 0,
            entries: HashMap::new(),
        };
        let stdin = files.insert(FileEntry::Stdin);
        let stdout = files.insert(FileEntry::Stdout);
        let stderr = files.insert(FileEntry::Stderr);
        debug_assert_eq!(stdin.0, 0);
        debug_assert_eq!(stdout.0, 1);
        debug_assert_eq!(stderr.0, 2);
        files
    }

    fn insert(&mut self, entry: FileEntry) -> FileHandle {
        let handle = FileHandle(self.next);
        self.next += 1;
        self.entries.insert(handle.0, entry);
        handle
    }

    pub fn stdin(&self) -> FileHandle {
        FileHandle(0)
    }

    pub fn stdout(&self) -> FileHandle {
        FileHandle(1)
    }

    pub fn stderr(&self) -> FileHandle {
        FileHandle(2)
    }

    pub fn open(&mut self, path: &str, append: bool) -> io::Result<FileHandle> {
        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .append(append)
            .open(path)?;
        Ok(self.insert(FileEntry::Real(file)))
    }

    pub fn close(&mut self, handle: FileHandle) -> JoyResult<()> {
        self.entries
            .remove(&handle.0)
            .map(|_| ())
            .ok_or_else(|| JoyError::domain("fclose", "file already closed"))
    }

    fn entry_mut(&mut self, op: &'static str, handle: FileHandle) -> JoyResult<&mut FileEntry> {
        self.entries
            .get_mut(&handle.0)
            .ok_or_else(|| JoyError::domain(op, "no such open file"))
    }

    pub fn write_bytes(&mut self, op: &'static str, handle: FileHandle, bytes: &[u8]) -> JoyResult<()> {
        match self.entry_mut(op, handle)? {
            FileEntry::Stdin => Err(JoyError::domain(op, "cannot write to stdin")),
            FileEntry::Stdout => {
                io::stdout()
                    .write_all(bytes)
                    .map_err(|e| JoyError::domain(op, e.to_string()))
            }
            FileEntry::Stderr => {
                io::stderr()
                    .write_all(bytes)
                    .map_err(|e| JoyError::domain(op, e.to_string()))
            }
            FileEntry::Real(f) => f
                .write_all(bytes)
                .map_err(|e| JoyError::domain(op, e.to_string())),
        }
    }

    pub fn read_line(&mut self, op: &'static str, handle: FileHandle) -> JoyResult<Vec<u8>> {
        match self.entry_mut(op, handle)? {
            FileEntry::Stdin => {
                let mut line = String::new();
                io::stdin()
                    .read_line(&mut line)
                    .map_err(|e| JoyError::domain(op, e.to_string()))?;
                Ok(line.into_bytes())
            }
            FileEntry::Stdout | FileEntry::Stderr => {
                Err(JoyError::domain(op, "cannot read from an output stream"))
            }
            FileEntry::Real(f) => {
                let mut buf = Vec::new();
                let mut byte = [0u8; 1];
                loop {
                    match f.read(&mut byte) {
                        Ok(0) => break,
                        Ok(_) => {
                            buf.push(byte[0]);
                            if byte[0] == b'\n' {
                                break;
                            }
                        }
                        Err(e) => return Err(JoyError::domain(op, e.to_string())),
                    }
                }
                Ok(buf)
            }
        }
    }

    pub fn read_char(&mut self, op: &'static str, handle: FileHandle) -> JoyResult<Option<u8>> {
        match self.entry_mut(op, handle)? {
            FileEntry::Real(f) => {
                let mut byte = [0u8; 1];
                match f.read(&mut byte) {
                    Ok(0) => Ok(None),
                    Ok(_) => Ok(Some(byte[0])),
                    Err(e) => Err(JoyError::domain(op, e.to_string())),
                }
            }
            FileEntry::Stdin => {
                let mut byte = [0u8; 1];
                match io::stdin().read(&mut byte) {
                    Ok(0) => Ok(None),
                    Ok(_) => Ok(Some(byte[0])),
                    Err(e) => Err(JoyError::domain(op, e.to_string())),
                }
            }
            _ => Err(JoyError::domain(op, "cannot read from an output stream")),
        }
    }

    pub fn seek(&mut self, op: &'static str, handle: FileHandle, pos: i64) -> JoyResult<()> {
        match self.entry_mut(op, handle)? {
            FileEntry::Real(f) => f
                .seek(SeekFrom::Start(pos.max(0) as u64))
                .map(|_| ())
                .map_err(|e| JoyError::domain(op, e.to_string())),
            _ => Err(JoyError::domain(op, "cannot seek a standard stream")),
        }
    }

    pub fn tell(&mut self, op: &'static str, handle: FileHandle) -> JoyResult<i64> {
        match self.entry_mut(op, handle)? {
            FileEntry::Real(f) => f
                .stream_position()
                .map(|p| p as i64)
                .map_err(|e| JoyError::domain(op, e.to_string())),
            _ => Err(JoyError::domain(op, "cannot tell a standard stream")),
        }
    }

    pub fn flush(&mut self, op: &'static str, handle: FileHandle) -> JoyResult<()> {
        match self.entry_mut(op, handle)? {
            FileEntry::Stdout => io::stdout().flush().map_err(|e| JoyError::domain(op, e.to_string())),
            FileEntry::Stderr => io::stderr().flush().map_err(|e| JoyError::domain(op, e.to_string())),
            FileEntry::Real(f) => f.flush().map_err(|e| JoyError::domain(op, e.to_string())),
            FileEntry::Stdin => Ok(()),
        }
    }
}

/// Execution context: the stack, the dictionary, the runtime flags, the
/// program-argument carrier, the open-file registry, and the PRNG state
/// `rand`/`srand` read and reseed.
pub struct Context {
    pub stack: OperandStack,
    pub dictionary: Dictionary,
    pub flags: RuntimeFlags,
    pub args: Vec<String>,
    pub files: Files,
    pub rng: StdRng,
}

impl Context {
    pub fn new() -> Self {
        Self::with_args(Vec::new())
    }

    pub fn with_args(args: Vec<String>) -> Self {
        let mut ctx = Self {
            stack: OperandStack::new(),
            dictionary: Dictionary::new(),
            flags: RuntimeFlags::default(),
            args,
            files: Files::new(),
            rng: StdRng::from_entropy(),
        };
        crate::primitives::register_all(&mut ctx.dictionary);
        ctx
    }

    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
