//! Readout engine style tests
//!
//! A small in-test engine walks a set of nodes and samples the way a real
//! readout engine would, calling the request filters per node, per sample and
//! per field, and fans out to worker threads after resolution.

use std::sync::Arc;
use std::thread;

use sensor_readout::{NodeReference, ReadoutRequest, ReadoutTypeSet};
use time::OffsetDateTime;
use time::macros::datetime;

struct Sample {
    node: (&'static str, &'static str, &'static str),
    field: &'static str,
    at: OffsetDateTime,
}

fn sample(
    node: &'static str,
    cache: &'static str,
    field: &'static str,
    at: OffsetDateTime,
) -> Sample {
    Sample {
        node: (node, cache, "B7"),
        field,
        at,
    }
}

fn samples() -> Vec<Sample> {
    vec![
        sample("Meter1", "Power", "Energy", datetime!(2020-01-01 10:00 UTC)),
        sample("Meter1", "Power", "Voltage", datetime!(2020-01-01 11:00 UTC)),
        sample("Meter1", "Power", "Energy", datetime!(2020-03-01 10:00 UTC)),
        sample("Meter2", "Power", "Energy", datetime!(2020-01-01 10:00 UTC)),
        sample("Meter1", "Water", "Energy", datetime!(2020-01-01 10:00 UTC)),
    ]
}

fn read(request: &ReadoutRequest, samples: &[Sample]) -> usize {
    samples
        .iter()
        .filter(|s| request.should_report_node(s.node.0, s.node.1, s.node.2))
        .filter(|s| request.should_report_timestamp(s.at))
        .filter(|s| request.should_report_field(s.field))
        .count()
}

#[test]
fn test_engine_applies_every_filter() {
    let request = ReadoutRequest::from_query_str(
        "nodeId=Meter1&cacheType=Power&historical=true&from=2020-01-01&to=2020-01-31&Energy",
    )
    .unwrap();

    assert_eq!(read(&request, &samples()), 1);
}

#[test]
fn test_unrestricted_request_reads_everything() {
    let request = ReadoutRequest::from_query_str("").unwrap();

    assert_eq!(read(&request, &samples()), samples().len());
}

#[test]
fn test_resolved_request_is_shared_with_workers() {
    let request = ReadoutRequest::from_query_str("momentary=true&Energy").unwrap();
    assert!(request.nodes().is_none());

    // resolve the implicit "all nodes" into the nodes this engine owns
    let shared = request
        .into_resolution()
        .set_nodes(Some(vec![
            NodeReference::new("Meter1", "Power", ""),
            NodeReference::with_id("Meter2"),
        ]))
        .set_types(ReadoutTypeSet::MOMENTARY_VALUES | ReadoutTypeSet::STATUS_VALUES)
        .publish();

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let request = Arc::clone(&shared);
            thread::spawn(move || read(&request, &samples()))
        })
        .collect();

    for worker in workers {
        assert_eq!(worker.join().unwrap(), 3);
    }
    assert!(shared.should_report_type(ReadoutTypeSet::STATUS_VALUES));
}
