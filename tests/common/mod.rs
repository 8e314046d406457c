use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// An in-memory `Write` sink that can be cloned and read back after a run.
/// `Lox::with_writer` wants an owned `Box<dyn Write>`, so the interpreter
/// gets one handle and the test keeps another pointing at the same buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("program output was not valid UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `source` in-process and asserts its captured stdout equals the
/// given lines, and that neither a static nor a runtime error occurred.
#[macro_export]
macro_rules! lox_ok {
    ($name:ident, $source:expr, [$($line:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            let buffer = $crate::common::SharedBuffer::default();
            let mut lox = lox::Lox::with_writer(Box::new(buffer.clone()));
            lox.run_source($source);

            assert!(!lox.diagnostics().had_error(), "unexpected static error for: {}", $source);
            assert!(!lox.diagnostics().had_runtime_error(), "unexpected runtime error for: {}", $source);

            let expected: Vec<&str> = vec![$($line),*];
            let expected = if expected.is_empty() {
                String::new()
            } else {
                format!("{}\n", expected.join("\n"))
            };
            assert_eq!(buffer.contents(), expected);
        }
    };
}

/// Runs `source` as a real subprocess and asserts it exits with `code` and
/// writes a line containing `needle` to standard output — diagnostics and
/// `print` output share one stream, so a real process is only needed here
/// to also pin down the exit code.
#[macro_export]
macro_rules! lox_err {
    ($name:ident, $source:expr, code: $code:expr, contains: $needle:expr) => {
        #[test]
        fn $name() {
            use assert_cmd::Command;
            use predicates::str::contains;

            let mut path = std::env::temp_dir();
            path.push(format!("lox_test_{}_{}.lox", stringify!($name), std::process::id()));
            std::fs::write(&path, $source).expect("failed to write temp script");

            let result = Command::cargo_bin("lox")
                .unwrap()
                .arg(&path)
                .assert()
                .code($code)
                .stdout(contains($needle));

            std::fs::remove_file(&path).ok();
            drop(result);
        }
    };
}
