use crate::OptionsError;

/// MQTT delivery guarantee levels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QoS {
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

impl TryFrom<i32> for QoS {
    type Error = OptionsError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            other => Err(OptionsError::invalid(format!(
                "QoS must be 0, 1 or 2, got {other}"
            ))),
        }
    }
}

impl From<QoS> for i32 {
    fn from(value: QoS) -> Self {
        match value {
            QoS::AtMostOnce => 0,
            QoS::AtLeastOnce => 1,
            QoS::ExactlyOnce => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qos_from_valid_levels() {
        assert_eq!(QoS::try_from(0).unwrap(), QoS::AtMostOnce);
        assert_eq!(QoS::try_from(1).unwrap(), QoS::AtLeastOnce);
        assert_eq!(QoS::try_from(2).unwrap(), QoS::ExactlyOnce);
        assert_eq!(i32::from(QoS::ExactlyOnce), 2);
    }

    #[test]
    fn test_qos_from_invalid_levels() {
        assert!(matches!(QoS::try_from(3), Err(OptionsError::InvalidArgument(_))));
        assert!(matches!(QoS::try_from(-1), Err(OptionsError::InvalidArgument(_))));
    }
}
