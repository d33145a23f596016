// ==========================================
// 库存运营管理系统 - 批量导入服务
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析文件 → 逐行处理（每行一个事务）→ 汇总批次结果
// 说明: 文件不可解析是批次级失败直接上抛；行内问题只汇入 failures
// ==========================================

use crate::importer::batch::BatchResult;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::orchestrator::BulkImportOrchestrator;
use crate::importer::processor::RowProcessor;
use crate::importer::processors::{
    ClientRowProcessor, DeliveryItemRowProcessor, DeliveryRowProcessor, PartRowProcessor,
    PriceRowProcessor, ProductPartMappingRowProcessor, ProductRowProcessor,
};
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{error, info, instrument};

// ==========================================
// ImportKind - 导入实体类别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Part,
    Product,
    ProductPartMapping,
    Client,
    Price,
    Delivery,
    DeliveryItem,
}

impl ImportKind {
    pub fn entity_name(&self) -> &'static str {
        match self {
            ImportKind::Part => "part",
            ImportKind::Product => "product",
            ImportKind::ProductPartMapping => "product_part_mapping",
            ImportKind::Client => "client",
            ImportKind::Price => "client_product_price",
            ImportKind::Delivery => "delivery",
            ImportKind::DeliveryItem => "delivery_item",
        }
    }
}

// ==========================================
// BulkImportApi Trait
// ==========================================
#[async_trait]
pub trait BulkImportApi: Send + Sync {
    /// 导入单个文件
    ///
    /// # 返回
    /// - Ok(BatchResult): 批次结果（行内失败在 failures 里）
    /// - Err: 文件不可解析或数据库故障（批次级失败）
    async fn import_file(&self, kind: ImportKind, file_path: &Path) -> ImportResult<BatchResult>;

    /// 批量导入多个文件（并发提交，单个文件失败不影响其他文件）
    async fn batch_import(
        &self,
        jobs: Vec<(ImportKind, PathBuf)>,
    ) -> ImportResult<Vec<Result<BatchResult, String>>>;
}

// ==========================================
// BulkImportService - 批量导入服务实现
// ==========================================
pub struct BulkImportService {
    orchestrator: BulkImportOrchestrator,
}

impl BulkImportService {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            orchestrator: BulkImportOrchestrator::new(conn),
        }
    }

    fn processor_for(kind: ImportKind) -> Box<dyn RowProcessor> {
        match kind {
            ImportKind::Part => Box::new(PartRowProcessor),
            ImportKind::Product => Box::new(ProductRowProcessor),
            ImportKind::ProductPartMapping => Box::new(ProductPartMappingRowProcessor),
            ImportKind::Client => Box::new(ClientRowProcessor),
            ImportKind::Price => Box::new(PriceRowProcessor),
            ImportKind::Delivery => Box::new(DeliveryRowProcessor::new()),
            ImportKind::DeliveryItem => Box::new(DeliveryItemRowProcessor),
        }
    }

    // ===== 按实体类别的便捷入口 =====

    pub async fn import_parts(&self, file_path: &Path) -> ImportResult<BatchResult> {
        self.import_file(ImportKind::Part, file_path).await
    }

    pub async fn import_products(&self, file_path: &Path) -> ImportResult<BatchResult> {
        self.import_file(ImportKind::Product, file_path).await
    }

    pub async fn import_product_part_mappings(
        &self,
        file_path: &Path,
    ) -> ImportResult<BatchResult> {
        self.import_file(ImportKind::ProductPartMapping, file_path)
            .await
    }

    pub async fn import_clients(&self, file_path: &Path) -> ImportResult<BatchResult> {
        self.import_file(ImportKind::Client, file_path).await
    }

    pub async fn import_prices(&self, file_path: &Path) -> ImportResult<BatchResult> {
        self.import_file(ImportKind::Price, file_path).await
    }

    pub async fn import_deliveries(&self, file_path: &Path) -> ImportResult<BatchResult> {
        self.import_file(ImportKind::Delivery, file_path).await
    }

    pub async fn import_delivery_items(&self, file_path: &Path) -> ImportResult<BatchResult> {
        self.import_file(ImportKind::DeliveryItem, file_path).await
    }
}

#[async_trait]
impl BulkImportApi for BulkImportService {
    #[instrument(skip(self, file_path), fields(entity = kind.entity_name()))]
    async fn import_file(&self, kind: ImportKind, file_path: &Path) -> ImportResult<BatchResult> {
        info!(file = %file_path.display(), "开始解析导入文件");

        let rows = UniversalFileParser::parse(file_path).map_err(|e| {
            error!(file = %file_path.display(), error = %e, "文件解析失败");
            e
        })?;
        info!(rows = rows.len(), "文件解析完成");

        let processor = Self::processor_for(kind);
        let result = self.orchestrator.run(&rows, processor.as_ref())?;

        info!(
            total = result.total_count,
            success = result.success_count,
            failed = result.failure_count,
            "文件导入完成"
        );
        Ok(result)
    }

    async fn batch_import(
        &self,
        jobs: Vec<(ImportKind, PathBuf)>,
    ) -> ImportResult<Vec<Result<BatchResult, String>>> {
        use futures::future::join_all;

        info!(count = jobs.len(), "开始批量导入文件");

        let tasks = jobs.iter().map(|(kind, path)| async move {
            match self.import_file(*kind, path).await {
                Ok(result) => Ok(result),
                Err(e) => {
                    error!(file = %path.display(), error = %e, "文件导入失败");
                    Err(format!("文件 {} 导入失败: {}", path.display(), e))
                }
            }
        });

        let results = join_all(tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        Ok(results)
    }
}
