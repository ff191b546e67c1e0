/*!
The interactive REPL: reads lines from standard input synchronously. Since
CL statements can span multiple physical lines via `INDENT`/`DEDENT` blocks,
the REPL accumulates lines into a chunk and only scans/parses/runs it once a
blank line closes the chunk - the same "blank line ends the block"
convention an interactive Python shell uses for the same reason.
*/

use crate::interpreter::Interpreter;
use std::io::{self, BufRead, Write};

pub fn run() {
    let interpreter = Interpreter::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() { "cl> " } else { "... " };
        print!("{prompt}");
        let _ = stdout.flush();

        let mut line = String::new();
        let bytes_read = match stdin.lock().read_line(&mut line) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("input error: {e}");
                break;
            }
        };
        if bytes_read == 0 {
            // EOF: run whatever is left in the buffer, then stop.
            if !buffer.trim().is_empty() {
                execute_chunk(&interpreter, &buffer);
            }
            break;
        }

        if line.trim().is_empty() && !buffer.is_empty() {
            execute_chunk(&interpreter, &buffer);
            buffer.clear();
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }
        buffer.push_str(&line);
    }
}

fn execute_chunk(interpreter: &Interpreter, source: &str) {
    let mut source = source.to_string();
    if !source.ends_with('\n') {
        source.push('\n');
    }
    if let Err(e) = crate::run_source(interpreter, &source) {
        eprintln!("{e}");
    }
}
