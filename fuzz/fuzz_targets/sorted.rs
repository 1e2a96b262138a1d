#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeSet as BeeSet;
use std::ops::Bound;

use bucketlist::{Ratios, SortedMultiset, SortedSet};

#[derive(Debug, Arbitrary)]
enum Command {
    Add { value: u8 },
    Discard { value: u8 },
    Contains { value: u8 },
    Neighbours { value: u8 },
    Rank { value: u8 },
    Get { index: i16 },
    Pop { index: i16 },
    PopFirst,
    PopLast,
    Extend { values: Vec<u8> },
    Rebuild,
    Clear,
}

fn resolve(index: i16, len: usize) -> Option<usize> {
    let index = index as isize;
    let len = len as isize;
    let resolved = if index < 0 { len + index } else { index };
    (resolved >= 0 && resolved < len).then_some(resolved as usize)
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(split_ratio) = unstructured.int_in_range(1..=6) else { return };
    let commands = match Vec::<Command>::arbitrary(&mut unstructured) {
        Ok(c) => c,
        Err(_) => return,
    };
    let ratios = Ratios::new(1, split_ratio);
    if SortedSet::<u8>::tuning().set(ratios).is_err()
        || SortedMultiset::<u8>::tuning().set(ratios).is_err()
    {
        return;
    }

    let mut set: SortedSet<u8> = SortedSet::new();
    let mut bee_set: BeeSet<u8> = BeeSet::new();
    let mut bag: SortedMultiset<u8> = SortedMultiset::new();
    let mut bag_model: Vec<u8> = Vec::new();

    for command in commands {
        set.validate_buckets();
        bag.validate_buckets();

        if std::env::var("RUST_BACKTRACE").is_ok() {
            println!("{command:?}");
        }

        match command {
            Command::Add { value } => {
                assert_eq!(set.add(value), bee_set.insert(value));
                assert!(bag.add(value));
                let i = bag_model.partition_point(|&x| x <= value);
                bag_model.insert(i, value);
            }
            Command::Discard { value } => {
                assert_eq!(set.discard(&value), bee_set.remove(&value));
                let i = bag_model.partition_point(|&x| x < value);
                let present = bag_model.get(i) == Some(&value);
                assert_eq!(bag.discard(&value), present);
                if present {
                    bag_model.remove(i);
                }
            }
            Command::Contains { value } => {
                assert_eq!(set.contains(&value), bee_set.contains(&value));
                assert_eq!(bag.contains(&value), bag_model.contains(&value));
            }
            Command::Neighbours { value } => {
                let below = (Bound::Unbounded, Bound::Excluded(value));
                let above = (Bound::Excluded(value), Bound::Unbounded);
                assert_eq!(set.lt(&value), bee_set.range(below).next_back());
                assert_eq!(set.le(&value), bee_set.range(..=value).next_back());
                assert_eq!(set.gt(&value), bee_set.range(above).next());
                assert_eq!(set.ge(&value), bee_set.range(value..).next());

                assert_eq!(bag.lt(&value), bag_model.iter().filter(|&&x| x < value).last());
                assert_eq!(bag.le(&value), bag_model.iter().filter(|&&x| x <= value).last());
                assert_eq!(bag.gt(&value), bag_model.iter().find(|&&x| x > value));
                assert_eq!(bag.ge(&value), bag_model.iter().find(|&&x| x >= value));
            }
            Command::Rank { value } => {
                assert_eq!(set.index(&value), bee_set.range(..value).count());
                assert_eq!(set.index_right(&value), bee_set.range(..=value).count());
                assert_eq!(bag.index(&value), bag_model.partition_point(|&x| x < value));
                assert_eq!(bag.index_right(&value), bag_model.partition_point(|&x| x <= value));
                assert_eq!(bag.count(&value), bag_model.iter().filter(|&&x| x == value).count());
            }
            Command::Get { index } => {
                assert_eq!(set.get(index as isize).ok(), resolve(index, bee_set.len()).and_then(|i| bee_set.iter().nth(i)));
                assert_eq!(bag.get(index as isize).ok(), resolve(index, bag_model.len()).map(|i| &bag_model[i]));
            }
            Command::Pop { index } => {
                let expected = resolve(index, bee_set.len())
                    .and_then(|i| bee_set.iter().nth(i).copied())
                    .inspect(|x| {
                        bee_set.remove(x);
                    });
                assert_eq!(set.pop(index as isize).ok(), expected);
                let expected = resolve(index, bag_model.len()).map(|i| bag_model.remove(i));
                assert_eq!(bag.pop(index as isize).ok(), expected);
            }
            Command::PopFirst => {
                assert_eq!(set.pop_first(), bee_set.pop_first());
                let expected = (!bag_model.is_empty()).then(|| bag_model.remove(0));
                assert_eq!(bag.pop_first(), expected);
            }
            Command::PopLast => {
                assert_eq!(set.pop_last(), bee_set.pop_last());
                assert_eq!(bag.pop_last(), bag_model.pop());
            }
            Command::Extend { values } => {
                set.extend(values.iter().copied());
                bee_set.extend(values.iter().copied());
                bag.extend(values.iter().copied());
                bag_model.extend(values);
                bag_model.sort();
            }
            Command::Rebuild => {
                set = set.into_iter().collect();
                bag = bag.iter().copied().collect();
            }
            Command::Clear => {
                set.clear();
                bee_set.clear();
                bag.clear();
                bag_model.clear();
            }
        }

        assert!(set.iter().eq(bee_set.iter()));
        assert_eq!(bag, bag_model);
    }
});
