//! Benchmarks for cvdocx export performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks export synthetic records of growing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cvdocx::{CvRecord, EducationEntry, ExperienceEntry};
use std::io::Cursor;

/// Creates a record with the given number of experience entries.
fn create_test_record(entry_count: usize) -> CvRecord {
    let mut record = CvRecord::sample();
    record.experience = (0..entry_count)
        .map(|i| {
            ExperienceEntry::new(format!("Role {}", i), format!("Company {}", i), "2020 - 2024")
                .with_description(
                    "Delivered projects for regional clients and kept accounts growing.",
                )
                .with_highlight(format!("Achievement {} with measurable impact", i))
        })
        .collect();
    record.education = (0..entry_count / 4 + 1)
        .map(|i| EducationEntry::new(format!("Degree {}", i), "University", "2015"))
        .collect();
    record.skills = (0..entry_count).map(|i| format!("Skill {}", i)).collect();
    record
}

fn create_test_photo(side: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(side, side, image::Rgb([90, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode benchmark photo");
    out.into_inner()
}

/// Benchmark export at various record sizes.
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for entry_count in [1, 10, 50, 200].iter() {
        let record = create_test_record(*entry_count);

        group.throughput(Throughput::Elements(*entry_count as u64));
        group.bench_with_input(
            BenchmarkId::new("entries", entry_count),
            &record,
            |b, record| {
                b.iter(|| {
                    let _ = cvdocx::export(black_box(record));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark export with an embedded photo.
fn bench_export_with_photo(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_with_photo");

    for side in [64, 512, 1024].iter() {
        let record = create_test_record(10).with_photo(create_test_photo(*side));
        let size = record.photo.as_ref().map(|p| p.len()).unwrap_or(0) as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::new("photo_px", side), &record, |b, record| {
            b.iter(|| {
                let _ = cvdocx::export(black_box(record));
            });
        });
    }

    group.finish();
}

/// Benchmark reading an exported package back.
fn bench_inspect(c: &mut Criterion) {
    let mut group = c.benchmark_group("inspect");

    for entry_count in [10, 200].iter() {
        let data = cvdocx::export(&create_test_record(*entry_count)).expect("export");

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("entries", entry_count),
            &data,
            |b, data| {
                b.iter(|| {
                    let _ = cvdocx::inspect(black_box(data));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_export, bench_export_with_photo, bench_inspect);
criterion_main!(benches);
