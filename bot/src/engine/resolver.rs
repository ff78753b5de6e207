use super::member::Member;

/// Strings whose Levenshtein-distance-to-length ratio is under this value
/// are considered the same name.
const LEVENSHTEIN_THRESHOLD: f64 = 0.3;

/// Resolve free-form user input to a member of `roster`.
///
/// Matching runs in three passes, each over the roster in its given order:
/// an exact id lookup, then fuzzy matching against every username, then
/// fuzzy matching against nicknames. Usernames are exhausted before any
/// nickname is consulted, so a member cannot shadow someone else's username
/// match by picking a colliding nickname.
///
/// Returns `None` when nothing matches; malformed input never errors.
pub fn resolve_member<'a>(input: &str, roster: &'a [Member]) -> Option<&'a Member> {
    if input.is_empty() || roster.is_empty() {
        return None;
    }

    let input = input.to_lowercase();

    // Pass 0: an exact id wins outright.
    if let Ok(id) = input.parse::<u64>()
        && let Some(member) = roster.iter().find(|m| m.id == id)
    {
        return Some(member);
    }

    // Pass 1: usernames, first match wins.
    for member in roster {
        if !member.username.is_empty() && names_match(&input, &member.username.to_lowercase()) {
            return Some(member);
        }
    }

    // Pass 2: nicknames, only once every username has been ruled out.
    for member in roster {
        if let Some(nickname) = member.nickname.as_deref()
            && !nickname.is_empty()
            && names_match(&input, &nickname.to_lowercase())
        {
            return Some(member);
        }
    }

    None
}

/// Whether `input` names `candidate`. Both must already be lowercase.
/// True on exact equality, a Levenshtein ratio under the threshold, or
/// `candidate` starting with `input`.
pub fn names_match(input: &str, candidate: &str) -> bool {
    if input == candidate {
        return true;
    }
    // An empty candidate has no length to divide the distance by and can
    // never pass the ratio test.
    if !candidate.is_empty() && levenshtein_ratio(input, candidate) < LEVENSHTEIN_THRESHOLD {
        return true;
    }
    candidate.starts_with(input)
}

/// Edit distance between `a` and `b`, normalized by `b`'s length in chars.
/// Callers must not pass an empty `b`.
pub fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    levenshtein(a, b) as f64 / b.chars().count() as f64
}

/// Unit-cost Levenshtein distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a.len()][b.len()]
}
