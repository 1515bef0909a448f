//! Status reporting for the operator.

/// Somewhere to show short, non-fatal messages.
pub trait StatusSink {
    fn info(&mut self, message: &str);
    fn error(&mut self, message: &str);

    /// Report an error value.
    fn report(&mut self, error: &dyn std::error::Error) {
        self.error(&error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BrowseError;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Recorded {
        infos: Vec<String>,
        errors: Vec<String>,
    }

    impl StatusSink for Recorded {
        fn info(&mut self, message: &str) {
            self.infos.push(message.to_string());
        }

        fn error(&mut self, message: &str) {
            self.errors.push(message.to_string());
        }
    }

    #[test]
    fn test_report_formats_error() {
        let mut sink = Recorded::default();
        sink.info("loaded");
        sink.report(&BrowseError::NotFound {
            path: PathBuf::from("/tank/x"),
        });

        assert_eq!(sink.infos, vec!["loaded"]);
        assert_eq!(sink.errors, vec!["no such file or directory: /tank/x"]);
    }
}
