use std::io::{BufRead, Write};

pub const SYS_EXIT: u32 = 0;
pub const SYS_PRINT_INT: u32 = 1;
pub const SYS_READ_INT: u32 = 3;

/// Environment servicing `SYSCALL`.
pub trait Host {
    fn print_int(&mut self, value: u32);
    /// `None` when no integer could be read.
    fn read_int(&mut self) -> Option<u32>;
}

/// Console host: prints to stdout, reads one integer per line from stdin.
#[derive(Debug, Default)]
pub struct StdHost;

impl Host for StdHost {
    fn print_int(&mut self, value: u32) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "Output: {value}");
    }

    fn read_int(&mut self) -> Option<u32> {
        {
            let mut out = std::io::stdout().lock();
            let _ = write!(out, "Input: ");
            let _ = out.flush();
        }
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).ok()?;
        let t = line.trim();
        t.parse::<u32>()
            .ok()
            .or_else(|| t.parse::<i32>().ok().map(|v| v as u32))
    }
}

/// Scripted host for tests and batch runs.
#[derive(Debug, Default, Clone)]
pub struct BufferHost {
    pub input: std::collections::VecDeque<u32>,
    pub output: Vec<u32>,
}

impl BufferHost {
    pub fn with_input(input: impl IntoIterator<Item = u32>) -> Self {
        Self {
            input: input.into_iter().collect(),
            output: Vec::new(),
        }
    }
}

impl Host for BufferHost {
    fn print_int(&mut self, value: u32) {
        self.output.push(value);
    }

    fn read_int(&mut self) -> Option<u32> {
        self.input.pop_front()
    }
}
