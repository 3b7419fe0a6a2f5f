// ==========================================
// 批量操作集成测试
// ==========================================
// 测试范围:
// 1. 平均分摊 (完整行筛选, 2 位小数, 残差保留)
// 2. 补满到 100 (最后完整行承接, 拒绝场景)
// 3. 按项目号批量添加 (token 解析, 未匹配静默跳过, 阶段自动选择)
// 4. 复制上周 (整体替换, 重编号, 阶段预取)
// ==========================================

mod test_helpers;

use labor_allocation::domain::{LineField, LineKind, NoticeKind, WorkLocation};

// ==========================================
// 平均分摊
// ==========================================

#[tokio::test]
async fn test_distribute_evenly_only_touches_complete_lines() {
    let (mut api, _, _) = test_helpers::loaded_api().await;
    test_helpers::make_complete_job_line(&mut api, 1, Some("80"));
    let id2 = api.add_line();
    test_helpers::make_complete_job_line(&mut api, id2, None);
    let id3 = api.add_line(); // 留空, 不完整

    api.distribute_evenly();

    assert_eq!(api.line(1).unwrap().percentage.as_deref(), Some("50.00"));
    assert_eq!(api.line(id2).unwrap().percentage.as_deref(), Some("50.00"));
    assert_eq!(api.line(id3).unwrap().percentage, None);
    assert_eq!(api.notice().unwrap().kind, NoticeKind::Success);
}

#[tokio::test]
async fn test_distribute_three_lines_leaves_residual() {
    let (mut api, _, _) = test_helpers::loaded_api().await;
    test_helpers::make_complete_job_line(&mut api, 1, None);
    for _ in 0..2 {
        let id = api.add_line();
        test_helpers::make_complete_job_line(&mut api, id, None);
    }

    api.distribute_evenly();

    for line in api.lines() {
        assert_eq!(line.percentage.as_deref(), Some("33.33"));
    }
    // 残差不回补: 总和停在 99.99
    assert!((api.total_percentage() - 99.99).abs() < 1e-9);
}

#[tokio::test]
async fn test_distribute_with_no_complete_lines_is_silent_noop() {
    let (mut api, _, _) = test_helpers::loaded_api().await;
    api.update_field(1, LineField::Percentage(Some("40".to_string())))
        .unwrap();

    api.distribute_evenly();

    assert_eq!(api.line(1).unwrap().percentage.as_deref(), Some("40"));
    assert!(api.notice().is_none());
}

// ==========================================
// 补满到 100
// ==========================================

#[tokio::test]
async fn test_fill_adds_remainder_to_last_complete_line() {
    let (mut api, _, _) = test_helpers::loaded_api().await;
    test_helpers::make_complete_job_line(&mut api, 1, Some("30"));
    let id2 = api.add_line();
    test_helpers::make_complete_job_line(&mut api, id2, None);

    api.fill_to_hundred().unwrap();

    assert_eq!(api.line(1).unwrap().percentage.as_deref(), Some("30"));
    assert_eq!(api.line(id2).unwrap().percentage.as_deref(), Some("70.00"));
    assert!((api.total_percentage() - 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_fill_rejects_when_total_already_full() {
    let (mut api, _, _) = test_helpers::loaded_api().await;
    test_helpers::make_complete_job_line(&mut api, 1, Some("100"));

    let result = api.fill_to_hundred();
    assert!(result.is_err());
    assert_eq!(api.line(1).unwrap().percentage.as_deref(), Some("100"));
    let notice = api.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.text.contains("already"));
}

#[tokio::test]
async fn test_fill_rejects_without_complete_line() {
    let (mut api, _, _) = test_helpers::loaded_api().await;
    api.update_field(1, LineField::Percentage(Some("40".to_string())))
        .unwrap();

    let result = api.fill_to_hundred();
    assert!(result.is_err());
    // 无部分变更
    assert_eq!(api.line(1).unwrap().percentage.as_deref(), Some("40"));
    assert_eq!(api.notice().unwrap().kind, NoticeKind::Error);
}

// ==========================================
// 批量添加
// ==========================================

#[tokio::test]
async fn test_bulk_add_skips_unknown_numbers_and_reports_count() {
    let (mut api, _, _) = test_helpers::loaded_api().await;

    // 9999 无匹配: 静默跳过, 只汇报添加数
    let added = api.bulk_add_jobs("3012, 9999, 3048").await.unwrap();
    assert_eq!(added, 2);
    assert_eq!(api.lines().len(), 3); // 初始空白行 + 2

    let first = &api.lines()[1];
    assert_eq!(first.kind, LineKind::Job);
    assert_eq!(first.job_id, Some(1));
    // 阶段列表加载完成后自动选中第一个阶段
    assert_eq!(first.phase_id, Some(1));
    assert_eq!(first.work_location, WorkLocation::Unset);

    // 3048 是外州项目: 默认 onsite
    let second = &api.lines()[2];
    assert_eq!(second.job_id, Some(3));
    assert_eq!(second.phase_id, Some(6));
    assert_eq!(second.work_location, WorkLocation::Onsite);

    let notice = api.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert!(notice.text.contains('2'));
}

#[tokio::test]
async fn test_bulk_add_with_zero_matches_errors_without_mutation() {
    let (mut api, _, _) = test_helpers::loaded_api().await;

    let result = api.bulk_add_jobs("9999 8888").await;
    assert!(result.is_err());
    assert_eq!(api.lines().len(), 1);
    assert_eq!(api.notice().unwrap().kind, NoticeKind::Error);
}

#[tokio::test]
async fn test_bulk_add_survives_phase_fetch_failure() {
    let (mut api, reference, _) = test_helpers::loaded_api().await;
    reference.fail_endpoint("phases");

    // 阶段获取失败: 行照常添加, 阶段留空等用户手动选择
    let added = api.bulk_add_jobs("3012, 3048").await.unwrap();
    assert_eq!(added, 2);
    assert_eq!(api.lines().len(), 3);
    assert_eq!(api.lines()[1].job_id, Some(1));
    assert_eq!(api.lines()[1].phase_id, None);
    assert_eq!(api.lines()[2].phase_id, None);
    // 外州规则不受阶段获取影响
    assert_eq!(api.lines()[2].work_location, WorkLocation::Onsite);
    // 失败的获取不污染缓存
    assert!(api.phases_for(1).is_none());

    let notice = api.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert!(notice.text.contains('2'));
}

#[tokio::test]
async fn test_bulk_add_blank_input_is_noop() {
    let (mut api, _, _) = test_helpers::loaded_api().await;
    let added = api.bulk_add_jobs("   ").await.unwrap();
    assert_eq!(added, 0);
    assert_eq!(api.lines().len(), 1);
    assert!(api.notice().is_none());
}

// ==========================================
// 复制上周
// ==========================================

#[tokio::test]
async fn test_copy_previous_replaces_whole_set_and_renumbers() {
    let (mut api, _, _) = test_helpers::loaded_api().await;
    // 先造一些会被整体替换掉的行
    test_helpers::make_complete_job_line(&mut api, 1, Some("10"));
    api.add_line();
    api.add_line();

    api.load_previous_allocation().await.unwrap();

    let ids: Vec<_> = api.lines().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![1, 2]);

    let first = api.line(1).unwrap();
    assert_eq!(first.job_id, Some(1));
    assert_eq!(first.phase_id, Some(2));
    assert_eq!(first.percentage.as_deref(), Some("60"));

    let second = api.line(2).unwrap();
    assert_eq!(second.job_id, Some(2));
    assert_eq!(second.percentage.as_deref(), Some("40"));

    // 引用到的项目阶段已预取进缓存
    assert!(api.phases_for(1).is_some());
    assert!(api.phases_for(2).is_some());

    // 60 + 40 = 100: 直接可提交
    assert!(api.is_submit_eligible());
    assert_eq!(api.notice().unwrap().kind, NoticeKind::Success);
}

#[tokio::test]
async fn test_copy_previous_completes_despite_phase_fetch_failure() {
    let (mut api, reference, _) = test_helpers::loaded_api().await;
    reference.fail_endpoint("phases");

    // 阶段预取失败不阻断复制本身
    api.load_previous_allocation().await.unwrap();

    assert_eq!(api.lines().len(), 2);
    assert_eq!(api.line(1).unwrap().percentage.as_deref(), Some("60"));
    assert_eq!(api.line(2).unwrap().percentage.as_deref(), Some("40"));
    assert!(api.phases_for(1).is_none());
    assert_eq!(api.notice().unwrap().kind, NoticeKind::Success);
}

#[tokio::test]
async fn test_copy_previous_failure_leaves_current_set_untouched() {
    let (mut api, reference, _) = test_helpers::loaded_api().await;
    test_helpers::make_complete_job_line(&mut api, 1, Some("25"));

    reference.fail_endpoint("previous_allocation");
    let result = api.load_previous_allocation().await;
    assert!(result.is_err());

    assert_eq!(api.lines().len(), 1);
    assert_eq!(api.line(1).unwrap().percentage.as_deref(), Some("25"));
    assert_eq!(api.notice().unwrap().kind, NoticeKind::Error);
}
