//
// Copyright (c) 2025 Nathan Fiedler
//
use bucket_array::BucketArray;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use std::time::Instant;

//
// Compare building, reading, and consuming a bucket array against a vector.
// The interesting number is the consume pass: the vector holds all of its
// memory until the pass completes while the bucket array gives it back one
// segment at a time.
//

fn benchmark_bucketarray(size: usize) {
    let start = Instant::now();
    let mut coll: BucketArray<usize> = BucketArray::new();
    for value in 0..size {
        coll.push(value);
    }
    let duration = start.elapsed();
    println!("bucketarray create: {:?} ({} segments)", duration, coll.segment_count());

    // test random access `size` times; use SmallRng to avoid dominating the
    // running time with random number generation
    let mut rng = SmallRng::seed_from_u64(0);
    let start = Instant::now();
    for _ in 0..size {
        let index = rng.random_range(0..size);
        assert_eq!(coll[index], index);
    }
    let duration = start.elapsed();
    println!("bucketarray random: {:?}", duration);

    // test sequenced access for entire collection
    let start = Instant::now();
    for (index, value) in coll.iter().enumerate() {
        assert_eq!(*value, index);
    }
    let duration = start.elapsed();
    println!("bucketarray ordered: {:?}", duration);

    let start = Instant::now();
    let mut sum: usize = 0;
    for value in coll.into_draining_iter() {
        sum = sum.wrapping_add(value);
    }
    let duration = start.elapsed();
    println!("bucketarray drain: {:?} (sum {})", duration, sum);
}

fn benchmark_vector(size: usize) {
    let start = Instant::now();
    let mut coll: Vec<usize> = Vec::new();
    for value in 0..size {
        coll.push(value);
    }
    let duration = start.elapsed();
    println!("vector create: {:?}", duration);

    // test random access `size` times; use SmallRng to avoid dominating the
    // running time with random number generation
    let mut rng = SmallRng::seed_from_u64(0);
    let start = Instant::now();
    for _ in 0..size {
        let index = rng.random_range(0..size);
        assert_eq!(coll[index], index);
    }
    let duration = start.elapsed();
    println!("vector random: {:?}", duration);

    // test sequenced access for entire collection
    let start = Instant::now();
    for (index, value) in coll.iter().enumerate() {
        assert_eq!(*value, index);
    }
    let duration = start.elapsed();
    println!("vector ordered: {:?}", duration);

    let start = Instant::now();
    let mut sum: usize = 0;
    for value in coll.into_iter() {
        sum = sum.wrapping_add(value);
    }
    let duration = start.elapsed();
    println!("vector drain: {:?} (sum {})", duration, sum);
}

fn main() {
    println!("creating BucketArray...");
    benchmark_bucketarray(100_000_000);
    println!("creating Vec...");
    benchmark_vector(100_000_000);
}
