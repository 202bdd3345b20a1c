use alfiere::magic::{self, Slider};

#[test]
fn magic_lookup_matches_ray_walk_everywhere() {
    alfiere::init();
    assert_eq!(magic::find_table_mismatch(), None);
}

#[test]
fn table_sizes_follow_relevant_masks() {
    alfiere::init();
    assert_eq!(magic::table_len(Slider::Rook), 102_400);
    assert_eq!(magic::table_len(Slider::Bishop), 5_248);
}
