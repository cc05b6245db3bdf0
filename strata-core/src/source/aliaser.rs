/// Generates the table aliases of one statement tree: `t`, `t1`, `t2`...
///
/// Sub statements are built with the aliaser of their host so that correlated references never
/// collide.
#[derive(Default, Debug, Clone)]
pub struct Aliaser {
    counter: usize,
}

impl Aliaser {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn next(&mut self) -> String {
        let result = if self.counter == 0 {
            "t".to_string()
        } else {
            format!("t{}", self.counter)
        };
        self.counter += 1;
        result
    }
    /// Number of aliases generated so far.
    pub fn count(&self) -> usize {
        self.counter
    }
}
