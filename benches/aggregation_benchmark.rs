use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use edge_dashboard::analyzers::{TrafficAnalyzer, TrafficDimension};
use edge_dashboard::models::{DateWindow, TrafficObservation, TravelDirection, VehicleClass};
use edge_dashboard::processors::RecordFilter;

// One detection every `step_secs` over `days` consecutive January days
fn create_test_traffic(days: u32, step_secs: u32) -> Vec<TrafficObservation> {
    let classes = [
        VehicleClass::Car,
        VehicleClass::Truck,
        VehicleClass::Bus,
        VehicleClass::Motorcycle,
    ];
    let mut records = Vec::new();

    for day in 0..days {
        let mut object_id = 0u32;
        for second in (0..86_400).step_by(step_secs as usize) {
            let timestamp = format!(
                "2024-01-{:02} {:02}:{:02}:{:02}",
                day + 1,
                second / 3600,
                (second / 60) % 60,
                second % 60
            );
            let direction = if object_id % 2 == 0 {
                TravelDirection::Left
            } else {
                TravelDirection::Right
            };
            records.push(TrafficObservation::new(
                &timestamp,
                object_id,
                classes[(object_id % 4) as usize],
                direction,
                20.0 + f64::from(object_id % 40),
            ));
            object_id += 1;
        }
    }

    records
}

fn benchmark_series(c: &mut Criterion) {
    let records = create_test_traffic(14, 30);
    let analyzer = TrafficAnalyzer::new();
    let mut group = c.benchmark_group("traffic_series");

    for (label, from, to) in [
        ("single_day", "2024-01-05", "2024-01-05"),
        ("two_days", "2024-01-05", "2024-01-06"),
        ("two_weeks", "2024-01-01", "2024-01-14"),
    ] {
        let window = DateWindow::new(from, to).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(label), &window, |b, window| {
            b.iter(|| black_box(analyzer.series(&records, window).len()))
        });
    }

    group.finish();
}

fn benchmark_breakdown(c: &mut Criterion) {
    let records = create_test_traffic(14, 30);
    let analyzer = TrafficAnalyzer::new();
    let filter = RecordFilter::new(DateWindow::new("2024-01-01", "2024-01-14").unwrap());

    c.bench_function("traffic_vehicle_class_breakdown", |b| {
        b.iter(|| {
            let selected = filter.select(&records);
            black_box(analyzer.category_breakdown(selected, TrafficDimension::VehicleClass))
        })
    });
}

criterion_group!(benches, benchmark_series, benchmark_breakdown);
criterion_main!(benches);
