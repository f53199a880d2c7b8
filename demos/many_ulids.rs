//
// Copyright (c) 2025 Nathan Fiedler
//
use bucket_array::BucketArray;

//
// Basically useless except that it can be tested with a memory analyzer to
// determine if the bucket array is leaking memory, and to watch the resident
// size fall while the drain works through the segments. By storing `String`
// instead of numbers, this is slightly more interesting in terms of memory
// management.
//
fn main() {
    let mut array: BucketArray<String> = BucketArray::with_segment_bytes(64 * 1024);
    // add enough values to allocate a bunch of segments
    for _ in 0..13_000 {
        let value = ulid::Ulid::new().to_string();
        array.push(value);
    }
    println!(
        "{} values in {} segments of {}",
        array.len(),
        array.segment_count(),
        array.segment_len()
    );
    let mut drain = array.into_draining_iter();
    for (index, value) in drain.by_ref().skip(32).enumerate() {
        if index == 32 {
            println!("32: {value}");
        } else if index == 1024 {
            println!("1024: {value}");
        } else if index == 6666 {
            println!("6666: {value}");
        } else if index == 10000 {
            println!("10000: {value}");
            break;
        }
    }
    println!("{} segments still live", drain.live_segments());
    // now the remaining segments are released when the drain is dropped
}
