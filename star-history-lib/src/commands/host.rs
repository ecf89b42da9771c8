use std::io::Write;

/// Abstract the host environment so commands can run against in-memory buffers
pub trait Host: Send + Sync {
    // where to send normal output (e.g., stdout)
    fn output(&mut self) -> impl Write;

    // where to send diagnostics and user-facing notices (e.g., stderr)
    fn error(&mut self) -> impl Write;
}

/// Test host that captures output to in-memory buffers
#[cfg(test)]
#[derive(Debug, Default)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
}

#[cfg(test)]
impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successive_writes_accumulate() {
        let mut host = TestHost::new();
        let _ = writeln!(host.output(), "first");
        let _ = writeln!(host.output(), "second");
        let _ = writeln!(host.error(), "oops");

        assert_eq!(host.output_str(), "first\nsecond\n");
        assert_eq!(host.error_buf, b"oops\n");
    }
}
