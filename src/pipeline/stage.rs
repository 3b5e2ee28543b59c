crate::define_flag_enum! {
    /// Steps a generation request moves through
    ///
    /// Outcomes are not stages: a finished request ends with `ProgressEvent::Completed`,
    /// a refused one with `ProgressEvent::Rejected`.
    Stage {
        Validating => "validating",
        Refining => "refining",
        Analyzing => "analyzing",
        ProceduralBaseline => "procedural_baseline",
        Merging => "merging",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_round_trip() {
        for stage in Stage::all_variants() {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), *stage);
        }
        assert_eq!(Stage::ProceduralBaseline.to_string(), "procedural_baseline");
    }

    #[test]
    fn test_unknown_stage() {
        assert!("scanning".parse::<Stage>().is_err());
        assert!("done".parse::<Stage>().is_err());
    }
}
