/// Finds the length of the common prefix of two byte strings.
///
/// This is where an edge and an incoming suffix part ways: the first position
/// at which they differ, or the end of the shorter one.
pub fn prefix_match(edge: &[u8], key: &[u8]) -> usize {
    edge.iter()
        .zip(key)
        .take_while(|(a, b)| a == b)
        .count()
}
