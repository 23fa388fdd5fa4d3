pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Human-readable size for the preview caption, e.g. "1.5 KB".
    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
        if size < 1024 {
            return format!("{} B", size);
        }

        let mut scaled = size as f64 / 1024.0;
        let mut unit = UNITS[0];
        for next in &UNITS[1..] {
            if scaled < 1024.0 {
                break;
            }
            scaled /= 1024.0;
            unit = *next;
        }
        format!("{:.1} {}", scaled, unit)
    }
}
