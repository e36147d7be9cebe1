use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::thread;
use tickwire::{
    Buffer, Clock, DoubleBuffer, Duration, Hertz, ManualClock, Queue, RingBuffer, SnapshotCache,
};

const MESSAGES: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, Default)]
struct Transform {
    position: [f32; 3],
    rotation: [f32; 4],
}

fn bench_double_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("double_buffer");
    let buffer = DoubleBuffer::new(Transform::default());

    group.bench_function("write", |b| {
        let mut x = 0.0f32;
        b.iter(|| {
            x += 1.0;
            buffer.write(black_box(Transform {
                position: [x, x, x],
                ..Transform::default()
            }));
        });
    });

    group.bench_function("read", |b| {
        b.iter(|| black_box(buffer.read()));
    });

    group.finish();
}

fn bench_spsc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spsc");
    group.throughput(Throughput::Elements(MESSAGES));

    group.bench_function("push_pop_threaded", |b| {
        b.iter(|| {
            let queue = Arc::new(Queue::<u64, 4096>::new());

            let producer_queue = Arc::clone(&queue);
            let producer = thread::spawn(move || {
                for i in 0..MESSAGES {
                    while producer_queue.size() >= producer_queue.capacity() - 1 {
                        std::hint::spin_loop();
                    }
                    producer_queue.push(i);
                }
            });

            let mut received = 0u64;
            while received < MESSAGES {
                match queue.pop_front() {
                    Some(value) => {
                        black_box(value);
                        received += 1;
                    }
                    None => std::hint::spin_loop(),
                }
            }

            producer.join().unwrap();
        });
    });

    group.bench_function("push_overwrite", |b| {
        let queue = Queue::<u64, 64>::new();
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            queue.push(black_box(i));
        });
    });

    group.finish();
}

fn bench_spmc(c: &mut Criterion) {
    let mut group = c.benchmark_group("spmc");

    for consumers in [1usize, 2, 4] {
        group.throughput(Throughput::Elements(MESSAGES));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("1P_{consumers}C")),
            &consumers,
            |b, &consumers| {
                b.iter(|| {
                    let ring = Arc::new(RingBuffer::<u64, 4096>::new());

                    let handles: Vec<_> = (0..consumers)
                        .map(|_| {
                            let ring = Arc::clone(&ring);
                            thread::spawn(move || {
                                let mut cursor = ring.cursor_at(0);
                                while cursor.position() < MESSAGES {
                                    match cursor.next() {
                                        Some(value) => {
                                            black_box(value);
                                        }
                                        None => std::hint::spin_loop(),
                                    }
                                }
                                cursor.missed()
                            })
                        })
                        .collect();

                    for i in 0..MESSAGES {
                        ring.push(i);
                    }

                    for handle in handles {
                        black_box(handle.join().unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("clock");

    group.bench_function("snapshot_steady", |b| {
        let clock = Clock::new(Hertz::new(60).unwrap());
        b.iter(|| black_box(clock.snapshot()));
    });

    group.bench_function("snapshot_push_and_find", |b| {
        let time = ManualClock::new();
        let clock = Clock::with_source(Hertz::new(120).unwrap(), time.clone());
        let cache = SnapshotCache::<256>::new();
        b.iter(|| {
            time.advance(Duration::from_millis(1.0));
            let snapshot = clock.snapshot();
            cache.push(snapshot);
            black_box(cache.find_by_time(snapshot.real_time - Duration::from_millis(50.0)));
            black_box(cache.find_by_frame(snapshot.frame.saturating_sub(3)));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_double_buffer, bench_spsc, bench_spmc, bench_clock);
criterion_main!(benches);
