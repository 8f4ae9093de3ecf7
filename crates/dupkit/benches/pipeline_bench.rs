use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use dupkit::model::{assemble_groups, RawRecord, RecordDetails, ToolData};
use dupkit::tools::{ColumnId, SearchField};
use dupkit::ui::rows::{compute_rows, SortSpec};
use dupkit::ui::viewport::Viewport;

const NAME_PATH: &[SearchField] = &[SearchField::FileName, SearchField::Path];

/// Build a deterministic grouped dataset: `group_count` clusters with
/// `members_per_group` files each, sizes and dates spread out so sorting
/// has real work to do.
fn build_grouped(group_count: usize, members_per_group: usize) -> ToolData {
    let tuples = (0..group_count)
        .map(|group| {
            let members = (0..members_per_group)
                .map(|member| RawRecord {
                    path: format!("/bench/dir_{:03}/file_{group:05}_{member}.bin", group % 97),
                    size: ((group * 7919 + member * 104_729) % 1_000_000) as u64,
                    modified: 1_500_000_000 + ((group * 37 + member * 17) % 100_000) as i64,
                    details: RecordDetails::File,
                })
                .collect();
            (None, members)
        })
        .collect();
    ToolData::Grouped(assemble_groups(tuples))
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_pipeline");

    // 2,500 groups x 4 members = 10,000 entries.
    let data = build_grouped(2_500, 4);
    let sort = Some(SortSpec {
        column: ColumnId::Size,
        descending: true,
    });

    group.bench_function("assemble_only", |b| {
        b.iter(|| compute_rows(black_box(&data), "", None, NAME_PATH))
    });

    group.bench_function("sorted", |b| {
        b.iter(|| compute_rows(black_box(&data), "", sort, NAME_PATH))
    });

    group.bench_function("filtered_and_sorted", |b| {
        b.iter(|| compute_rows(black_box(&data), "dir_04", sort, NAME_PATH))
    });

    group.finish();
}

fn bench_viewport(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport");

    for row_count in [10_000usize, 100_000] {
        let mut viewport = Viewport::default();
        viewport.set_row_count(row_count);
        let total = viewport.total_height();

        group.bench_with_input(
            BenchmarkId::new("window_sweep", row_count),
            &row_count,
            |b, _| {
                b.iter(|| {
                    // Sweep the scroll range in coarse steps, as a user
                    // dragging the scrollbar would.
                    let mut acc = 0usize;
                    let step = (total / 100).max(1);
                    let mut offset = 0;
                    while offset < total {
                        if let Some(window) = viewport.window(black_box(offset), 800) {
                            acc += window.last - window.first;
                        }
                        offset += step;
                    }
                    acc
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_viewport);
criterion_main!(benches);
