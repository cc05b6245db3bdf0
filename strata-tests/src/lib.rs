mod catalog;
mod read;
mod write;

pub use catalog::catalog;
use log::LevelFilter;
use std::env;
use strata_core::SqlWriter;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Build every scenario against the shared catalog and render it with the writer.
///
/// The plans are shaped by the features the writer declares, the assertions follow them.
pub fn execute_tests(writer: &dyn SqlWriter) {
    log::debug!("Running the scenarios with the `{}` writer", writer.name());
    read::select(writer);
    read::paged(writer);
    read::grouped(writer);
    read::empty_list(writer);
    read::exist(writer);
    read::aggregate(writer);
    read::failures(writer);
    write::insert(writer);
    write::insert_children(writer);
    write::insert_many(writer);
    write::insert_slot(writer);
    write::update(writer);
    write::update_bulk(writer);
    write::upsert(writer);
    write::delete(writer);
    write::delete_cascade(writer);
    write::execute(writer);
}
