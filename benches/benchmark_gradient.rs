use cmfast_util::cosmology::Cosmology;
use cmfast_util::gradient::{normalized_velocity_gradient, LOS_AXIS};
use criterion::Criterion;
use criterion::{criterion_group, criterion_main};
use ndarray::Array3;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

const SIZES: [usize; 3] = [32, 64, 128];

pub fn bench_gradient(c: &mut Criterion) {
    let mut group = c.benchmark_group("VelocityGradient");
    group.significance_level(0.1).sample_size(10);
    let cosmo = Cosmology::new(0.6774, 0.3075);
    for n in SIZES.iter() {
        let vel = Array3::<f32>::random((*n, *n, *n), Uniform::new(-1e-14, 1e-14));
        let name = format!("Size: {}", *n);
        group.bench_function(&name, |b| {
            b.iter(|| normalized_velocity_gradient(&vel, 300., LOS_AXIS, &cosmo, 6.))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gradient);
criterion_main!(benches);
