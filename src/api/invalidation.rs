use serde::{Deserialize, Serialize};

/// Reason a series needs to be laid out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidationTopic {
    Data,
    Config,
    GroupMembership,
    Visibility,
    Layout,
}

impl InvalidationTopic {
    const fn bit(self) -> u8 {
        match self {
            Self::Data => 1 << 0,
            Self::Config => 1 << 1,
            Self::GroupMembership => 1 << 2,
            Self::Visibility => 1 << 3,
            Self::Layout => 1 << 4,
        }
    }
}

/// Bitmask of pending invalidation topics for one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationTopics {
    bits: u8,
}

impl InvalidationTopics {
    const ALL_BITS: u8 = InvalidationTopic::Data.bit()
        | InvalidationTopic::Config.bit()
        | InvalidationTopic::GroupMembership.bit()
        | InvalidationTopic::Visibility.bit()
        | InvalidationTopic::Layout.bit();

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    #[must_use]
    pub const fn from_topic(topic: InvalidationTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: InvalidationTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    pub fn insert(&mut self, topic: InvalidationTopic) {
        self.bits |= topic.bit();
    }

    #[must_use]
    pub const fn contains_topic(self, topic: InvalidationTopic) -> bool {
        self.bits & topic.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidationTopic, InvalidationTopics};

    #[test]
    fn invalidation_topics_with_topic_and_contains_work() {
        let topics = InvalidationTopics::from_topic(InvalidationTopic::Data)
            .with_topic(InvalidationTopic::GroupMembership);
        assert!(topics.contains_topic(InvalidationTopic::Data));
        assert!(topics.contains_topic(InvalidationTopic::GroupMembership));
        assert!(!topics.contains_topic(InvalidationTopic::Visibility));

        let mut merged = topics;
        merged.insert(InvalidationTopic::Layout);
        assert!(merged.contains_topic(InvalidationTopic::Layout));
        assert!(!topics.contains_topic(InvalidationTopic::Layout));
    }

    #[test]
    fn cleared_topics_are_empty() {
        let mut topics = InvalidationTopics::all();
        assert!(!topics.is_empty());
        topics.clear();
        assert!(topics.is_empty());
        topics.insert(InvalidationTopic::Config);
        assert_eq!(
            topics,
            InvalidationTopics::from_topic(InvalidationTopic::Config)
        );
    }
}
