//! Integration tests for bp-output.

use bp_core::{Event, Statement};
use bp_program::{Program, ProgramBuilder};
use bp_select::EnumerativeStrategy;
use bp_thread::{Chain, once, thread};

/// Producer requests X then Y; a waiter parks on Y.
fn small_program() -> Program<EnumerativeStrategy> {
    let producer = Chain::new()
        .then(once(Statement::new().request(Event::named("X"))))
        .then(once(Statement::new().request(Event::named("Y"))));
    ProgramBuilder::new(EnumerativeStrategy::new())
        .unit(thread("producer", producer))
        .unit(thread("waiter", once(Statement::new().wait_for(Event::named("Y")))))
        .build()
        .unwrap()
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::small_program;
    use crate::csv::CsvTraceWriter;
    use crate::row::{RoundRow, UnitFailureRow};
    use crate::writer::TraceWriter;
    use crate::TraceObserver;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read(dir: &TempDir, file: &str) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvTraceWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("rounds.csv").exists());
        assert!(dir.path().join("unit_states.csv").exists());
        assert!(dir.path().join("unit_failures.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("rounds.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["round", "status", "event", "resumed", "live"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("unit_states.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["round", "unit_id", "name", "phase", "statement"]);
    }

    #[test]
    fn rows_written_in_order() {
        let dir = tmp();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        for round in 0..3 {
            w.write_round(&RoundRow {
                round,
                status:  "progressing".into(),
                event:   format!("E{round}"),
                resumed: 1,
                live:    2,
            })
            .unwrap();
        }
        w.write_failure(&UnitFailureRow {
            round:   2,
            unit_id: 7,
            name:    "flaky".into(),
            cause:   "unit failed: boom".into(),
        })
        .unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // idempotent

        let rounds = read(&dir, "rounds.csv");
        assert_eq!(rounds.len(), 3);
        assert_eq!(&rounds[2][2], "E2");
        let failures = read(&dir, "unit_failures.csv");
        assert_eq!(&failures[0][2], "flaky");
    }

    #[test]
    fn observer_writes_program_trace() {
        let dir = tmp();
        let mut obs = TraceObserver::new(CsvTraceWriter::new(dir.path()).unwrap());
        let outcome = small_program().run(&mut obs).unwrap();
        assert!(outcome.is_completed());
        assert!(obs.take_error().is_none());

        let rounds = read(&dir, "rounds.csv");
        let summary: Vec<(String, String)> =
            rounds.iter().map(|r| (r[1].to_owned(), r[2].to_owned())).collect();
        assert_eq!(
            summary,
            [
                ("progressing".to_owned(), "X".to_owned()),
                ("progressing".to_owned(), "Y".to_owned()),
                ("drained".to_owned(), String::new()),
            ]
        );

        // After round 0 the waiter is still parked on Y; the producer is
        // runnable again.
        let units = read(&dir, "unit_states.csv");
        let round0: Vec<_> = units.iter().filter(|r| &r[0] == "0").collect();
        assert_eq!(round0.len(), 2);
        assert_eq!(&round0[0][3], "runnable");
        assert_eq!(&round0[1][2], "waiter");
        assert_eq!(&round0[1][3], "parked");
        assert_eq!(&round0[1][4], "sync(waitFor=Y)");
    }
}

#[cfg(test)]
mod json_tests {
    use super::small_program;
    use crate::json::JsonTraceWriter;
    use crate::TraceObserver;

    #[test]
    fn one_tagged_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut obs = TraceObserver::new(JsonTraceWriter::new(dir.path()).unwrap()).rounds_only();
        small_program().run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let text = std::fs::read_to_string(dir.path().join("trace.jsonl")).unwrap();
        let lines: Vec<serde_json::Value> =
            text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|v| v["kind"] == "round"));
        assert_eq!(lines[0]["event"], "X");
        assert_eq!(lines[2]["status"], "drained");
    }

    #[test]
    fn boxed_writer_is_a_writer() {
        use crate::TraceWriter;

        let dir = tempfile::tempdir().unwrap();
        let writer: Box<dyn TraceWriter> = Box::new(JsonTraceWriter::new(dir.path()).unwrap());
        let mut obs = TraceObserver::new(writer);
        small_program().run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let text = std::fs::read_to_string(dir.path().join("trace.jsonl")).unwrap();
        assert!(text.lines().any(|l| l.contains("\"kind\":\"unit\"")));
    }
}
