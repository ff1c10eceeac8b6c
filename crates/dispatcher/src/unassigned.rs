//! 未分配页查找
//!
//! 作业的人员变化后重新分配时，先按已经分配出去的页算出每个文件还需要分配的页。

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use allocator_core::errors::AllocationError;
use allocator_core::models::{File, TrackedFile};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Annotation,
    Validation,
}

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Annotation => "annotation",
            Activity::Validation => "validation",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activity {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "annotation" => Ok(Activity::Annotation),
            "validation" => Ok(Activity::Validation),
            other => Err(AllocationError::Configuration(format!(
                "未知的分配类型: {other}"
            ))),
        }
    }
}

/// 文件在该活动上仍需分配的部分；已全部分配时返回 `None`
pub fn find_unassigned_pages(file: &TrackedFile, activity: Activity) -> Option<File> {
    let tracked = match activity {
        Activity::Annotation => &file.distributed_annotating_pages,
        Activity::Validation => &file.distributed_validating_pages,
    };

    let tracked: HashSet<u32> = tracked
        .iter()
        .copied()
        .filter(|page| (1..=file.pages_number).contains(page))
        .collect();

    if tracked.is_empty() {
        return Some(File::new(file.file_id, file.pages_number));
    }
    if tracked.len() == file.pages_number as usize {
        return None;
    }

    let unassigned: Vec<u32> = (1..=file.pages_number)
        .filter(|page| !tracked.contains(page))
        .collect();
    Some(File::with_unassigned_pages(
        file.file_id,
        file.pages_number,
        unassigned,
    ))
}

pub fn find_unassigned_files(files: &[TrackedFile], activity: Activity) -> Vec<File> {
    files
        .iter()
        .filter_map(|file| find_unassigned_pages(file, activity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(pages_number: u32, annotated: Vec<u32>, validated: Vec<u32>) -> TrackedFile {
        let mut file = TrackedFile::new(1, pages_number);
        file.distributed_annotating_pages = annotated;
        file.distributed_validating_pages = validated;
        file
    }

    #[test]
    fn test_fully_tracked_file_is_excluded() {
        let file = tracked(3, vec![3, 1, 2], vec![]);
        assert!(find_unassigned_pages(&file, Activity::Annotation).is_none());
    }

    #[test]
    fn test_untracked_file_is_whole() {
        let file = tracked(4, vec![1, 2, 3, 4], vec![]);
        let residual = find_unassigned_pages(&file, Activity::Validation).unwrap();
        assert_eq!(residual, File::new(1, 4));
        assert_eq!(residual.eligible_count(), 4);
    }

    #[test]
    fn test_partially_tracked_file_gets_complement() {
        let file = tracked(6, vec![5, 2], vec![1, 2, 3, 4, 5]);

        let residual = find_unassigned_pages(&file, Activity::Annotation).unwrap();
        assert_eq!(residual.unassigned_pages, Some(vec![1, 3, 4, 6]));

        let residual = find_unassigned_pages(&file, Activity::Validation).unwrap();
        assert_eq!(residual.eligible_pages(), vec![6]);
    }

    #[test]
    fn test_find_unassigned_files_filters_done_files() {
        let done = tracked(2, vec![1, 2], vec![]);
        let mut open = tracked(2, vec![1], vec![]);
        open.file_id = 2;

        let files = find_unassigned_files(&[done, open], Activity::Annotation);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_id, 2);
    }

    #[test]
    fn test_activity_parse() {
        assert_eq!("Validation".parse::<Activity>().unwrap(), Activity::Validation);
        assert!("review".parse::<Activity>().is_err());
        assert_eq!(Activity::Annotation.to_string(), "annotation");
    }
}
