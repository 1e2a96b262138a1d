#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;

use bucketlist::{BucketList, Ratios};

#[derive(Debug, Arbitrary)]
enum Command {
    Insert { index: i16, value: u8 },
    Append { value: u8 },
    Extend { values: Vec<u8> },
    Get { index: i16 },
    GetMut { index: i16, value: u8 },
    Pop { index: i16 },
    PopLast,
    PopFirst,
    Contains { value: u8 },
    Count { value: u8 },
    Index { value: u8 },
    Remove { value: u8 },
    Reverse,
    Clear,
    Rebuild,
    Clone,
    Iter,
    Reversed,
}

/// Python-style index resolution against the model.
fn resolve(index: i16, len: usize, inclusive_end: bool) -> Option<usize> {
    let index = index as isize;
    let len = len as isize;
    let upper = if inclusive_end { len } else { len - 1 };
    let resolved = if index < 0 { len + index } else { index };
    (index >= -len && resolved >= 0 && resolved <= upper).then_some(resolved as usize)
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);
    let Ok(split_ratio) = unstructured.int_in_range(1..=6) else { return };
    let commands = match Vec::<Command>::arbitrary(&mut unstructured) {
        Ok(c) => c,
        Err(_) => return,
    };
    if BucketList::<u8>::tuning().set(Ratios::new(1, split_ratio)).is_err() {
        return;
    }

    let mut list: BucketList<u8> = BucketList::new();
    let mut model: Vec<u8> = Vec::new();

    for command in commands {
        list.validate_buckets();

        if std::env::var("RUST_BACKTRACE").is_ok() {
            println!("{command:?}");
        }

        match command {
            Command::Insert { index, value } => {
                let expected = if model.is_empty() {
                    (index == 0 || index == -1).then_some(0)
                } else {
                    resolve(index, model.len(), true)
                };
                let result = list.insert(index as isize, value);
                assert_eq!(result.is_ok(), expected.is_some());
                if let Some(i) = expected {
                    model.insert(i, value);
                }
            }
            Command::Append { value } => {
                list.append(value);
                model.push(value);
            }
            Command::Extend { values } => {
                list.extend(values.iter().copied());
                model.extend(values);
            }
            Command::Get { index } => {
                let expected = resolve(index, model.len(), false).map(|i| &model[i]);
                assert_eq!(list.get(index as isize).ok(), expected);
            }
            Command::GetMut { index, value } => {
                match resolve(index, model.len(), false) {
                    Some(i) => {
                        *list.get_mut(index as isize).unwrap() = value;
                        model[i] = value;
                    }
                    None => assert!(list.get_mut(index as isize).is_err()),
                }
            }
            Command::Pop { index } => {
                let expected = resolve(index, model.len(), false).map(|i| model.remove(i));
                assert_eq!(list.pop(index as isize).ok(), expected);
            }
            Command::PopLast => {
                assert_eq!(list.pop_last(), model.pop());
            }
            Command::PopFirst => {
                let expected = (!model.is_empty()).then(|| model.remove(0));
                assert_eq!(list.pop_first(), expected);
            }
            Command::Contains { value } => {
                assert_eq!(list.contains(&value), model.contains(&value));
            }
            Command::Count { value } => {
                assert_eq!(list.count(&value), model.iter().filter(|&&x| x == value).count());
            }
            Command::Index { value } => {
                assert_eq!(list.index(&value).ok(), model.iter().position(|&x| x == value));
            }
            Command::Remove { value } => {
                let position = model.iter().position(|&x| x == value);
                assert_eq!(list.remove(&value).is_ok(), position.is_some());
                if let Some(i) = position {
                    model.remove(i);
                }
            }
            Command::Reverse => {
                list.reverse();
                model.reverse();
            }
            Command::Clear => {
                list.clear();
                model.clear();
                assert_eq!(list.bucket_count(), 0);
            }
            Command::Rebuild => {
                list = list.into_iter().collect();
            }
            Command::Clone => {
                let cloned = list.clone();
                assert_eq!(cloned, list);
                list = cloned;
            }
            Command::Iter => {
                assert!(list.iter().eq(model.iter()));
            }
            Command::Reversed => {
                assert!(list.reversed().eq(model.iter().rev()));
            }
        }

        assert_eq!(list.len(), model.len());
        assert_eq!(list, model);
    }
});
