pub mod stage1_score;
pub mod stage2_aggregate;
pub mod stage3_correlate;
pub mod stage4_plot;
