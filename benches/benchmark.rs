use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sulctools::{read_label, FsLabel};

fn synthetic_label(num_vertices: usize) -> FsLabel {
    let mut label = FsLabel::new_for_subject("bench_subject");
    for i in 0..num_vertices {
        label.vertex_index.push(i as i32);
        label.coord1.push(i as f32 * 0.125);
        label.coord2.push(-(i as f32) * 0.25);
        label.coord3.push(i as f32 * 0.5);
        label.value.push(0.0);
    }
    label
}

fn bench_label_io(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lh.bench.label");
    let label = synthetic_label(50_000);
    label.write_to_file(&path).unwrap();

    c.bench_function("read_label", |b| {
        b.iter(|| read_label(black_box(&path)).unwrap())
    });
    c.bench_function("write_label", |b| {
        b.iter(|| label.write_to_file(black_box(&path)).unwrap())
    });
}

criterion_group!(benches, bench_label_io);
criterion_main!(benches);
