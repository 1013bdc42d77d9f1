//! 数据集缓存
//!
//! 数据集只在首次访问时加载，之后所有请求共享同一份 `Arc<Dataset>`。
//! 失效规则：源文件修改时间变化时重新加载。

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use crate::models::Dataset;
use super::loader::{self, DataError};

struct CachedDataset {
    /// 最近一次尝试加载时的文件修改时间（无论成功与否）
    modified: Option<SystemTime>,
    dataset: Arc<Dataset>,
}

/// 按文件修改时间失效的数据集缓存
pub struct DatasetCache {
    path: PathBuf,
    state: RwLock<Option<CachedDataset>>,
}

impl DatasetCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cached(&self) -> Option<(Option<SystemTime>, Arc<Dataset>)> {
        let guard = self.state.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .map(|c| (c.modified, Arc::clone(&c.dataset)))
    }

    /// 获取数据集，必要时重新加载
    ///
    /// 文件无法读取或解析时，如果已有缓存则继续使用旧数据并记录警告；
    /// 没有缓存时返回错误。
    pub fn get(&self) -> Result<Arc<Dataset>, DataError> {
        let cached = self.cached();

        let modified = match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => Some(modified),
            Err(e) => match cached {
                Some((_, dataset)) => {
                    log::warn!("无法读取 {} 的元数据，继续使用缓存: {}", self.path.display(), e);
                    return Ok(dataset);
                }
                None => return Err(DataError::Io(e)),
            },
        };

        if let Some((cached_modified, dataset)) = &cached {
            if *cached_modified == modified {
                return Ok(Arc::clone(dataset));
            }
        }

        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        // 等待写锁期间其他线程可能已完成重新加载
        if let Some(current) = guard.as_ref() {
            if current.modified == modified {
                return Ok(Arc::clone(&current.dataset));
            }
        }

        match loader::load(&self.path) {
            Ok(dataset) => {
                if cached.is_some() {
                    log::info!("数据文件已变更，重新加载: {}", self.path.display());
                }
                let dataset = Arc::new(dataset);
                *guard = Some(CachedDataset {
                    modified,
                    dataset: Arc::clone(&dataset),
                });
                Ok(dataset)
            }
            Err(e) => match guard.as_mut() {
                Some(current) => {
                    log::warn!("重新加载 {} 失败，继续使用缓存: {}", self.path.display(), e);
                    // 文件再次变更前不再重试
                    current.modified = modified;
                    Ok(Arc::clone(&current.dataset))
                }
                None => Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::loader::tests::wide_csv;
    use std::fs;
    use std::time::Duration;

    fn write_csv(path: &Path, rows: &[(&str, f64)], modified: SystemTime) {
        fs::write(path, wide_csv(rows)).unwrap();
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(modified).unwrap();
    }

    #[test]
    fn test_cache_reuses_dataset_while_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        write_csv(&path, &[("2024-01-02", 1.0)], SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));

        let cache = DatasetCache::new(&path);
        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_reloads_when_mtime_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        write_csv(&path, &[("2024-01-02", 1.0)], SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));

        let cache = DatasetCache::new(&path);
        assert_eq!(cache.get().unwrap().len(), 1);

        write_csv(
            &path,
            &[("2024-01-02", 1.0), ("2024-01-03", 2.0)],
            SystemTime::UNIX_EPOCH + Duration::from_secs(2_000),
        );
        assert_eq!(cache.get().unwrap().len(), 2);
    }

    #[test]
    fn test_cache_serves_stale_on_reload_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        write_csv(&path, &[("2024-01-02", 1.0)], SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));

        let cache = DatasetCache::new(&path);
        let original = cache.get().unwrap();

        fs::write(&path, "Date\nbroken\n").unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(3_000)).unwrap();

        assert!(Arc::ptr_eq(&original, &cache.get().unwrap()));
    }

    #[test]
    fn test_cache_does_not_retry_failed_reload_until_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        write_csv(&path, &[("2024-01-02", 1.0)], SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));

        let cache = DatasetCache::new(&path);
        let original = cache.get().unwrap();

        fs::write(&path, "Date\nbroken\n").unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(3_000)).unwrap();
        assert!(Arc::ptr_eq(&original, &cache.get().unwrap()));

        // 内容已修好但修改时间与失败那次相同：不会重新解析
        write_csv(
            &path,
            &[("2024-01-02", 1.0), ("2024-01-03", 2.0)],
            SystemTime::UNIX_EPOCH + Duration::from_secs(3_000),
        );
        assert!(Arc::ptr_eq(&original, &cache.get().unwrap()));

        // 修改时间变化后重新加载
        write_csv(
            &path,
            &[("2024-01-02", 1.0), ("2024-01-03", 2.0)],
            SystemTime::UNIX_EPOCH + Duration::from_secs(4_000),
        );
        assert_eq!(cache.get().unwrap().len(), 2);
    }

    #[test]
    fn test_cache_serves_stale_when_file_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        write_csv(&path, &[("2024-01-02", 1.0)], SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));

        let cache = DatasetCache::new(&path);
        let original = cache.get().unwrap();

        fs::remove_file(&path).unwrap();
        assert!(Arc::ptr_eq(&original, &cache.get().unwrap()));
    }

    #[test]
    fn test_cache_missing_file_without_cache_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DatasetCache::new(dir.path().join("missing.csv"));
        assert!(matches!(cache.get(), Err(DataError::Io(_))));
    }
}
