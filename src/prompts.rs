pub const HOTSPOTS: &str = include_str!("../data/prompts/hotspots.txt");
