//! Arity expansion helpers.

/// Expands to `1` for any identifier; used to count macro repetitions.
macro_rules! one {
    ($x:ident) => {
        1
    };
}

/// Invoke `$m!` once per supported arity (0 through 8 parameters).
macro_rules! for_each_arity {
    ($m:ident) => {
        $m!();
        $m!(A1);
        $m!(A1, A2);
        $m!(A1, A2, A3);
        $m!(A1, A2, A3, A4);
        $m!(A1, A2, A3, A4, A5);
        $m!(A1, A2, A3, A4, A5, A6);
        $m!(A1, A2, A3, A4, A5, A6, A7);
        $m!(A1, A2, A3, A4, A5, A6, A7, A8);
    };
}
