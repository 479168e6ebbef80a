// SPDX-License-Identifier: Apache-2.0

//! Wire contract for the certforge HTTP surface: request/response
//! DTOs, the error taxonomy, and conversions from the domain model.
//! Handlers in `certforge-server` speak only these types to clients.

pub mod convert;
pub mod dto;
pub mod errors;

pub use convert::{
    detail_to_dto, draft_from_body, norm_to_dto, record_to_dto, summary_to_dto,
};
pub use dto::{
    DetailRowDto, NormBodyDto, NormDto, UploadResponseDto, ValidationDetailDto,
    ValidationRecordDto, ValidationSummaryDto,
};
pub use errors::{ApiError, ApiErrorCode};
