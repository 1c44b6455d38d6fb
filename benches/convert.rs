use criterion::{criterion_group, criterion_main, Criterion};
use geoexact::convert::Converter;
use geoexact::exact::PreparedGeometry;
use geoexact::io::wkt::read_simple;
use geoexact::simple::SfGeometry;
use geoexact::storage::{CopyStrategy, ExactStrategy, PersistenceStrategy};

fn create_data() -> SfGeometry {
    // An L shape with a hole, repeated along x
    let polygons = (0..200)
        .map(|i| {
            let x = (i * 5) as f64;
            format!(
                "(({x} 0,{} 0,{} 1,{} 1,{} 4,{x} 4,{x} 0),({} 2,{} 3,{} 3,{} 2,{} 2))",
                x + 4.,
                x + 4.,
                x + 1.,
                x + 1.,
                x + 0.25,
                x + 0.25,
                x + 0.75,
                x + 0.75,
                x + 0.25,
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    read_simple(&format!("SRID=4326;MULTIPOLYGON({polygons})"), 8).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let data = create_data();
    let converter = Converter::default();
    let exact = converter.to_exact(&data).unwrap();

    c.bench_function("to exact", |b| {
        b.iter(|| {
            let _ = converter.to_exact(&data).unwrap();
        })
    });
    c.bench_function("to simple", |b| {
        b.iter(|| {
            let _ = converter.to_simple(&exact, false, 4326).unwrap();
        })
    });

    let prepared = PreparedGeometry::new(exact, 4326);
    let copy = CopyStrategy::default();
    let blob = ExactStrategy::default();
    let copy_token = copy.encode(prepared.clone()).unwrap();
    let exact_token = blob.encode(prepared).unwrap();
    c.bench_function("copy decode", |b| {
        b.iter(|| {
            let _ = copy.decode(&copy_token).unwrap();
        })
    });
    c.bench_function("exact decode", |b| {
        b.iter(|| {
            let _ = blob.decode(&exact_token).unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
