//! In-memory host for driving the session loop from tests.

use std::collections::VecDeque;

use super::{InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal};

/// Queued input lines and signals go in; every written `Output` is kept.
#[derive(Debug, Default)]
pub struct TestHost {
    input_queue: VecDeque<String>,
    signal_queue: VecDeque<Signal>,
    output_buffer: Vec<Output>,
    prompts: Vec<PromptConfig>,
    flush_count: usize,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host preloaded with `lines`, consumed in order.
    pub fn with_inputs(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut host = Self::new();
        host.queue_inputs(lines);
        host
    }

    pub fn queue_input(&mut self, line: impl Into<String>) {
        self.input_queue.push_back(line.into());
    }

    pub fn queue_inputs(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
        for line in lines {
            self.queue_input(line);
        }
    }

    pub fn queue_signal(&mut self, signal: Signal) {
        self.signal_queue.push_back(signal);
    }

    pub fn output(&self) -> &[Output] {
        &self.output_buffer
    }

    /// All output text, one entry per line.
    pub fn output_text(&self) -> String {
        self.output_buffer
            .iter()
            .map(|o| o.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn output_with_style(&self, style: OutputStyle) -> Vec<&str> {
        self.output_buffer
            .iter()
            .filter(|o| o.style == style)
            .map(|o| o.text.as_str())
            .collect()
    }

    /// Plain output: result rows, tables and help.
    pub fn normal(&self) -> Vec<&str> {
        self.output_with_style(OutputStyle::Normal)
    }

    pub fn errors(&self) -> Vec<&str> {
        self.output_with_style(OutputStyle::Error)
    }

    pub fn infos(&self) -> Vec<&str> {
        self.output_with_style(OutputStyle::Info)
    }

    pub fn last_prompt(&self) -> Option<&PromptConfig> {
        self.prompts.last()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.len()
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    pub fn clear_output(&mut self) {
        self.output_buffer.clear();
    }

    pub fn has_pending_input(&self) -> bool {
        !self.input_queue.is_empty()
    }
}

impl IoHost for TestHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        // Running out of scripted input ends the session like Ctrl+D would.
        if self.input_queue.is_empty() && self.signal_queue.is_empty() {
            self.signal_queue.push_back(Signal::Eof);
        }
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.input_queue.pop_front().map(|line| InputLine { line }))
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.signal_queue.pop_front())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        self.output_buffer.push(output);
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.prompts.push(config);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.flush_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_are_consumed_in_order() {
        let mut host = TestHost::with_inputs(["list", "info"]);

        assert_eq!(host.read_input().unwrap().unwrap().line, "list");
        assert_eq!(host.read_input().unwrap().unwrap().line, "info");
        assert!(host.read_input().unwrap().is_none());
        assert!(!host.has_pending_input());
    }

    #[test]
    fn exhausted_input_raises_eof() {
        let mut host = TestHost::new();
        host.wait_for_input().unwrap();
        assert!(matches!(host.read_signal().unwrap(), Some(Signal::Eof)));
    }

    #[test]
    fn queued_signal_comes_before_eof() {
        let mut host = TestHost::new();
        host.queue_signal(Signal::Interrupt);
        host.wait_for_input().unwrap();

        assert!(matches!(host.read_signal().unwrap(), Some(Signal::Interrupt)));
        assert!(host.read_signal().unwrap().is_none());
    }

    #[test]
    fn output_is_split_by_style() {
        let mut host = TestHost::new();
        host.write_output(Output::normal("1|apple|5")).unwrap();
        host.write_output(Output::error("Error - Invalid column: [x]"))
            .unwrap();
        host.write_output(Output::info("Number of results: 1"))
            .unwrap();

        assert_eq!(host.normal(), vec!["1|apple|5"]);
        assert_eq!(host.errors(), vec!["Error - Invalid column: [x]"]);
        assert_eq!(host.infos(), vec!["Number of results: 1"]);
        assert_eq!(
            host.output_text(),
            "1|apple|5\nError - Invalid column: [x]\nNumber of results: 1"
        );

        host.clear_output();
        assert!(host.output().is_empty());
    }

    #[test]
    fn prompts_and_flushes_are_tracked() {
        let mut host = TestHost::new();
        host.write_prompt(PromptConfig {
            file_name: Some("fruit.dsv".to_string()),
            data_rows: 2,
            columns: Vec::new(),
        })
        .unwrap();
        host.flush().unwrap();

        let prompt = host.last_prompt().unwrap();
        assert_eq!(prompt.file_name.as_deref(), Some("fruit.dsv"));
        assert_eq!(prompt.data_rows, 2);
        assert_eq!(host.prompt_count(), 1);
        assert_eq!(host.flush_count(), 1);
    }
}
