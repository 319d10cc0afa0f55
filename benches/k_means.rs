use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use lloyd::Partition as _;
use lloyd::Point3D;
use rand::Rng as _;
use rand::SeedableRng as _;
use rand_pcg::Pcg64;

const POINT_COUNT: usize = 100_000;

fn uniform_cube(rng: &mut Pcg64, side: f64, num_points: usize) -> Vec<Point3D> {
    (0..num_points)
        .map(|_| {
            Point3D::new(
                rng.gen_range(0.0..side),
                rng.gen_range(0.0..side),
                rng.gen_range(0.0..side),
            )
        })
        .collect()
}

pub fn bench(c: &mut Criterion) {
    let mut rng = Pcg64::seed_from_u64(0);
    let points = uniform_cube(&mut rng, 100.0, POINT_COUNT);
    let centres = uniform_cube(&mut rng, 100.0, 16);
    let (_, cluster_ids) = lloyd::assign_points(&points, &centres).unwrap();
    let mut partition = vec![0; POINT_COUNT];

    c.bench_function("assign_points", |b| {
        b.iter(|| lloyd::assign_points(black_box(&points), black_box(&centres)))
    });
    c.bench_function("update_centres", |b| {
        b.iter(|| lloyd::update_centres(black_box(&points), black_box(&cluster_ids), &centres))
    });

    let mut group = c.benchmark_group("k_means");
    group.sample_size(10);
    for thread_count in [1, 2, 4, 8] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .build()
            .unwrap();
        group.bench_function(thread_count.to_string(), |b| {
            pool.install(|| {
                b.iter(|| {
                    lloyd::KMeans {
                        restart_count: 4,
                        ..lloyd::KMeans::new(Pcg64::seed_from_u64(1), 16)
                    }
                    .partition(black_box(&mut partition), black_box(&points[..]))
                })
            });
        });
    }
}

criterion_group!(benches, bench);
criterion_main!(benches);
