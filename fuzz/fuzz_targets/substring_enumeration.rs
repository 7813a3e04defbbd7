#![no_main]

use libfuzzer_sys::fuzz_target;
use passgrind::{ByteBlock, Const, Expression, Substring};

fuzz_target!(|data: &[u8]| {
    // Every window visited must lie inside the child output
    let Some((&bounds, rest)) = data.split_first() else { return };
    let min_len = usize::from(bounds & 0x0f);
    let max_len = usize::from(bounds >> 4);
    let Ok(mut s) = Substring::with_bounds(Box::new(Const::new(ByteBlock::from(rest))), min_len, max_len) else {
        return;
    };
    s.init_state();
    loop {
        assert_eq!(s.length(), s.eval().len());
        if !s.next_state() {
            break;
        }
    }
});
