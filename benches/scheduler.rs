//! Dispatch and IPC throughput benchmarks.
//!
//! Not a goal of a didactic simulator, but kept in the teacher's style of
//! benchmarking hot paths under `criterion` rather than leaving them
//! unmeasured.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kernelsim::Simulator;

fn bench_create_and_quantum(c: &mut Criterion) {
    c.bench_function("create_then_quantum_cycle", |b| {
        b.iter(|| {
            let mut sim = Simulator::new();
            for _ in 0..16 {
                sim.create(black_box(1)).unwrap();
            }
            for _ in 0..16 {
                sim.quantum().unwrap();
            }
            black_box(sim.current_pid());
        });
    });
}

fn bench_send_receive_reply_roundtrip(c: &mut Criterion) {
    c.bench_function("send_receive_reply_roundtrip", |b| {
        b.iter(|| {
            let mut sim = Simulator::new();
            sim.create(1).unwrap(); // pid 1
            sim.create(1).unwrap(); // pid 2
            sim.quantum().unwrap(); // current -> pid 2
            sim.send(black_box(1), "ping").unwrap(); // current -> pid 1
            sim.receive().unwrap();
            sim.reply(2, "pong").unwrap();
            sim.quantum().unwrap(); // dispatch pid 2, delivering the reply
            black_box(sim.current_pid());
        });
    });
}

fn bench_semaphore_contention(c: &mut Criterion) {
    c.bench_function("semaphore_p_v_cycle", |b| {
        b.iter(|| {
            let mut sim = Simulator::new();
            sim.create(1).unwrap();
            sim.new_sem(0, 4).unwrap();
            for _ in 0..4 {
                sim.sem_p(black_box(0)).unwrap();
            }
            for _ in 0..4 {
                sim.sem_v(black_box(0)).unwrap();
            }
            black_box(sim.totalinfo());
        });
    });
}

criterion_group!(
    benches,
    bench_create_and_quantum,
    bench_send_receive_reply_roundtrip,
    bench_semaphore_contention
);
criterion_main!(benches);
