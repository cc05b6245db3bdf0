#[cfg(test)]
mod tests {
    use strata::GenericSqlWriter;
    use strata_tests::{execute_tests, init_logs};

    #[test]
    fn generic() {
        init_logs();
        execute_tests(&GenericSqlWriter::new());
    }
}
