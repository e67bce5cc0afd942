use std::time::Duration;

#[derive(Default)]
pub struct Timings {
    pub decode_time: Duration,
    pub analysis_time: Duration,
    pub optimize_time: Duration,
    pub total_time: Duration,
}

impl Timings {
    pub fn emit(&self) {
        eprintln!("=====================");
        eprintln!("BRILC TIMINGS:");
        eprintln!("=====================");

        eprintln!("decode duration: {:#?}", self.decode_time);
        eprintln!("analysis duration: {:#?}", self.analysis_time);
        eprintln!("optimization duration: {:#?}", self.optimize_time);
        eprintln!("total duration: {:#?}", self.total_time);

        eprintln!("=====================");
    }
}
