//! Debug markers from `EXT_debug_marker`.
//!
//! Markers annotate the command stream for frame debuggers. When the
//! extension is not available every call here is a no-op.
use crate::{device::Device, native::Native};

impl<N: Native> Device<N> {
    pub fn has_debug_markers(&self) -> bool {
        self.native.has_debug_markers()
    }

    pub fn insert_event_marker(&self, marker: &str) {
        if self.has_debug_markers() {
            unsafe {
                self.native.insert_event_marker(marker);
            }
            self.check("Insert Event Marker");
        }
    }

    pub fn push_group_marker(&self, marker: &str) {
        if self.has_debug_markers() {
            unsafe {
                self.native.push_group_marker(marker);
            }
            self.check("Push Group Marker");
        }
    }

    pub fn pop_group_marker(&self) {
        if self.has_debug_markers() {
            unsafe {
                self.native.pop_group_marker();
            }
            self.check("Pop Group Marker");
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        config::DeviceConfig,
        device::Device,
        native::mock::{Call, Recorder},
    };

    #[test]
    fn test_markers_forwarded_when_available() {
        let device =
            Device::with_config(Recorder::with_debug_markers(), DeviceConfig::unchecked());
        assert!(device.has_debug_markers());

        device.push_group_marker("Shadow pass");
        device.insert_event_marker("Draw floor");
        device.pop_group_marker();

        assert_eq!(
            device.native().calls(),
            vec![
                Call::PushGroupMarker("Shadow pass".to_string()),
                Call::InsertEventMarker("Draw floor".to_string()),
                Call::PopGroupMarker,
            ]
        );
    }

    #[test]
    fn test_markers_ignored_without_extension() {
        let device = Device::with_config(Recorder::new(), DeviceConfig::default());
        assert!(!device.has_debug_markers());

        device.push_group_marker("Shadow pass");
        device.pop_group_marker();

        assert!(device.native().calls().is_empty());
    }
}
