mod history_record;
mod rate_observation;

pub use history_record::HistoryRecord;
pub use rate_observation::RateObservation;
