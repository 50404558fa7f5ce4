pub mod history_queries;
