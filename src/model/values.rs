//! Named scalar values of the ADM elements.

use super::{RangeValidator, Time};

named_type! {
    pub AudioProgrammeName(String) as AudioProgrammeNameTag = "audioProgrammeName";
    pub AudioProgrammeLanguage(String) as AudioProgrammeLanguageTag = "audioProgrammeLanguage";
    pub AudioContentName(String) as AudioContentNameTag = "audioContentName";
    pub AudioContentLanguage(String) as AudioContentLanguageTag = "audioContentLanguage";
    pub AudioObjectName(String) as AudioObjectNameTag = "audioObjectName";
    pub AudioPackFormatName(String) as AudioPackFormatNameTag = "audioPackFormatName";
    pub AudioChannelFormatName(String) as AudioChannelFormatNameTag = "audioChannelFormatName";
    pub AudioStreamFormatName(String) as AudioStreamFormatNameTag = "audioStreamFormatName";
    pub AudioTrackFormatName(String) as AudioTrackFormatNameTag = "audioTrackFormatName";

    pub Start(Time) as StartTag = "start";
    pub End(Time) as EndTag = "end";
    pub Duration(Time) as DurationTag = "duration";
    /// Start of a block format relative to its object.
    pub Rtime(Time) as RtimeTag = "rtime";

    /// 0 (least) to 10 (most important).
    pub Importance(i32, RangeValidator<0, 10>) as ImportanceTag = "importance";
    /// Ducking depth in dB.
    pub MaxDuckingDepth(f64, RangeValidator<-62, 0>) as MaxDuckingDepthTag = "maxDuckingDepth";
    pub Interact(bool) as InteractTag = "interact";
    pub DisableDucking(bool) as DisableDuckingTag = "disableDucking";
    pub AbsoluteDistance(f32) as AbsoluteDistanceTag = "absoluteDistance";

    pub Normalization(String) as NormalizationTag = "normalization";
    pub NfcRefDist(f32) as NfcRefDistTag = "nfcRefDist";
    pub ScreenRef(bool) as ScreenRefTag = "screenRef";

    pub SampleRate(u32) as SampleRateTag = "sampleRate";
    pub BitDepth(u32) as BitDepthTag = "bitDepth";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_importance_range() {
        assert!(Importance::try_new(10).is_ok());
        assert!(matches!(Importance::try_new(11), Err(Error::OutOfRange { min: 0, max: 10, .. })));
    }

    #[test]
    fn test_ducking_depth_range() {
        assert!(MaxDuckingDepth::try_new(-30.0).is_ok());
        assert!(MaxDuckingDepth::try_new(-62.5).is_err());
        assert!(MaxDuckingDepth::try_new(0.5).is_err());
    }

    #[test]
    fn test_time_values() {
        let start = Start::new(Time::from_secs(10));
        assert_eq!(start.to_string(), "00:00:10.00000");
        assert!(start > Time::from_secs(9));
    }
}
