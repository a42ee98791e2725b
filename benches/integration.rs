use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rp_bubble::{Bubble, BubbleParams, OdeSystem, RayleighPlesset, Rk4};

fn bench_acetone_coarse_run(c: &mut Criterion) {
    let params = BubbleParams {
        t_run: 2e-6,
        ..Default::default()
    };

    c.bench_function("acetone_2us_radiating", |b| {
        b.iter(|| {
            let mut bubble = Bubble::new(black_box(params.clone())).unwrap();
            bubble.integrate().unwrap()
        })
    });
}

fn bench_collapse_tier(c: &mut Criterion) {
    let base = BubbleParams::default();
    let params = BubbleParams {
        r_start: 0.3 * base.r0,
        t_run: 2000.0 * base.dt_fine,
        ..base
    };

    c.bench_function("acetone_fine_tier_2000_steps", |b| {
        b.iter(|| {
            let mut bubble = Bubble::new(black_box(params.clone())).unwrap();
            bubble.integrate().unwrap()
        })
    });
}

fn bench_rhs(c: &mut Criterion) {
    let model = RayleighPlesset::new(&BubbleParams::default());
    let rhs = model.with_feedback(Some(1e9));
    let y = [4.2e-5, -1.3];

    c.bench_function("rayleigh_plesset_rhs", |b| {
        b.iter(|| {
            let mut dydt = [0.0; 2];
            rhs.rhs(black_box(1e-6), black_box(&y), &mut dydt);
            dydt
        })
    });

    c.bench_function("rk4_single_step", |b| {
        let mut rk4 = Rk4::<2>::new();
        b.iter(|| rk4.step(&rhs, black_box(1e-6), black_box(&y), 1e-9))
    });
}

criterion_group!(
    benches,
    bench_acetone_coarse_run,
    bench_collapse_tier,
    bench_rhs
);
criterion_main!(benches);
