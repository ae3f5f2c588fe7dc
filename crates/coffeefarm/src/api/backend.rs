use async_trait::async_trait;
use secrecy::SecretString;

use crate::api::cache::Tag;
use crate::api::client::ApiClient;
use crate::api::farms::FarmQuery;
use crate::error::ApiError;
use crate::media::ImagePayload;
use crate::models::{
    AnalysisUpload, Attendance, AttendanceReceipt, CheckInRequest, CheckOutRequest,
    CoffeeBeansAnalysis, CoffeeLeavesAnalysis, CreateFarmer, DashboardStatistics,
    EnrollmentImages, FaceAngle, FaceEnrollResponse, FaceQualityResponse, FaceVerifyResponse,
    Farm, Farmer, FarmerAttendanceHistory, FarmerQuery, LoginResponse, TodayAttendances,
    UpdateFarmer,
};

/// The backend operations the screen models depend on.
///
/// [`ApiClient`] is the real implementation; tests substitute a scripted
/// fake.
#[async_trait]
pub trait FarmBackend: Send + Sync {
    async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, ApiError>;

    /// Drops the session token and every cached query.
    fn logout(&self);

    /// Drops cached queries so the next read refetches.
    fn invalidate(&self, tags: &[Tag]) -> usize;

    async fn list_farmers(&self, query: &FarmerQuery) -> Result<Vec<Farmer>, ApiError>;
    async fn get_farmer(&self, id: &str) -> Result<Farmer, ApiError>;
    async fn create_farmer(&self, farmer: &CreateFarmer) -> Result<Farmer, ApiError>;
    async fn update_farmer(&self, id: &str, update: &UpdateFarmer) -> Result<Farmer, ApiError>;
    async fn delete_farmer(&self, id: &str) -> Result<(), ApiError>;
    async fn farmer_attendances(&self, id: &str) -> Result<FarmerAttendanceHistory, ApiError>;

    async fn list_farms(&self, query: &FarmQuery) -> Result<Vec<Farm>, ApiError>;

    async fn today_attendance(&self, farm_id: Option<&str>) -> Result<TodayAttendances, ApiError>;
    async fn active_attendance(&self, farm_id: Option<&str>) -> Result<Vec<Attendance>, ApiError>;
    async fn check_in(&self, request: &CheckInRequest) -> Result<AttendanceReceipt, ApiError>;
    async fn check_out(
        &self,
        attendance_id: &str,
        request: &CheckOutRequest,
    ) -> Result<AttendanceReceipt, ApiError>;

    async fn verify_face(&self, image: &ImagePayload) -> Result<FaceVerifyResponse, ApiError>;
    async fn check_face_quality(
        &self,
        image: &ImagePayload,
        expected_angle: Option<FaceAngle>,
    ) -> Result<FaceQualityResponse, ApiError>;
    async fn enroll_face(
        &self,
        farmer_id: &str,
        images: &EnrollmentImages,
    ) -> Result<FaceEnrollResponse, ApiError>;
    async fn delete_face_enrollment(&self, farmer_id: &str) -> Result<(), ApiError>;

    async fn analyze_beans(
        &self,
        image: &ImagePayload,
        upload: &AnalysisUpload,
    ) -> Result<CoffeeBeansAnalysis, ApiError>;
    async fn analyze_leaves(
        &self,
        image: &ImagePayload,
        upload: &AnalysisUpload,
    ) -> Result<CoffeeLeavesAnalysis, ApiError>;
    async fn beans_history(&self) -> Result<Vec<CoffeeBeansAnalysis>, ApiError>;
    async fn leaves_history(&self) -> Result<Vec<CoffeeLeavesAnalysis>, ApiError>;
    async fn get_beans_analysis(&self, id: &str) -> Result<CoffeeBeansAnalysis, ApiError>;
    async fn get_leaves_analysis(&self, id: &str) -> Result<CoffeeLeavesAnalysis, ApiError>;

    async fn dashboard_statistics(&self) -> Result<DashboardStatistics, ApiError>;
}

#[async_trait]
impl FarmBackend for ApiClient {
    async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, ApiError> {
        ApiClient::login(self, email, password).await
    }

    fn logout(&self) {
        ApiClient::logout(self)
    }

    fn invalidate(&self, tags: &[Tag]) -> usize {
        ApiClient::invalidate(self, tags)
    }

    async fn list_farmers(&self, query: &FarmerQuery) -> Result<Vec<Farmer>, ApiError> {
        ApiClient::list_farmers(self, query).await
    }

    async fn get_farmer(&self, id: &str) -> Result<Farmer, ApiError> {
        ApiClient::get_farmer(self, id).await
    }

    async fn create_farmer(&self, farmer: &CreateFarmer) -> Result<Farmer, ApiError> {
        ApiClient::create_farmer(self, farmer).await
    }

    async fn update_farmer(&self, id: &str, update: &UpdateFarmer) -> Result<Farmer, ApiError> {
        ApiClient::update_farmer(self, id, update).await
    }

    async fn delete_farmer(&self, id: &str) -> Result<(), ApiError> {
        ApiClient::delete_farmer(self, id).await
    }

    async fn farmer_attendances(&self, id: &str) -> Result<FarmerAttendanceHistory, ApiError> {
        ApiClient::farmer_attendances(self, id).await
    }

    async fn list_farms(&self, query: &FarmQuery) -> Result<Vec<Farm>, ApiError> {
        ApiClient::list_farms(self, query).await
    }

    async fn today_attendance(&self, farm_id: Option<&str>) -> Result<TodayAttendances, ApiError> {
        ApiClient::today_attendance(self, farm_id).await
    }

    async fn active_attendance(&self, farm_id: Option<&str>) -> Result<Vec<Attendance>, ApiError> {
        ApiClient::active_attendance(self, farm_id).await
    }

    async fn check_in(&self, request: &CheckInRequest) -> Result<AttendanceReceipt, ApiError> {
        ApiClient::check_in(self, request).await
    }

    async fn check_out(
        &self,
        attendance_id: &str,
        request: &CheckOutRequest,
    ) -> Result<AttendanceReceipt, ApiError> {
        ApiClient::check_out(self, attendance_id, request).await
    }

    async fn verify_face(&self, image: &ImagePayload) -> Result<FaceVerifyResponse, ApiError> {
        ApiClient::verify_face(self, image).await
    }

    async fn check_face_quality(
        &self,
        image: &ImagePayload,
        expected_angle: Option<FaceAngle>,
    ) -> Result<FaceQualityResponse, ApiError> {
        ApiClient::check_face_quality(self, image, expected_angle).await
    }

    async fn enroll_face(
        &self,
        farmer_id: &str,
        images: &EnrollmentImages,
    ) -> Result<FaceEnrollResponse, ApiError> {
        ApiClient::enroll_face(self, farmer_id, images).await
    }

    async fn delete_face_enrollment(&self, farmer_id: &str) -> Result<(), ApiError> {
        ApiClient::delete_face_enrollment(self, farmer_id).await
    }

    async fn analyze_beans(
        &self,
        image: &ImagePayload,
        upload: &AnalysisUpload,
    ) -> Result<CoffeeBeansAnalysis, ApiError> {
        ApiClient::analyze_beans(self, image, upload).await
    }

    async fn analyze_leaves(
        &self,
        image: &ImagePayload,
        upload: &AnalysisUpload,
    ) -> Result<CoffeeLeavesAnalysis, ApiError> {
        ApiClient::analyze_leaves(self, image, upload).await
    }

    async fn beans_history(&self) -> Result<Vec<CoffeeBeansAnalysis>, ApiError> {
        ApiClient::beans_history(self).await
    }

    async fn leaves_history(&self) -> Result<Vec<CoffeeLeavesAnalysis>, ApiError> {
        ApiClient::leaves_history(self).await
    }

    async fn get_beans_analysis(&self, id: &str) -> Result<CoffeeBeansAnalysis, ApiError> {
        ApiClient::get_beans_analysis(self, id).await
    }

    async fn get_leaves_analysis(&self, id: &str) -> Result<CoffeeLeavesAnalysis, ApiError> {
        ApiClient::get_leaves_analysis(self, id).await
    }

    async fn dashboard_statistics(&self) -> Result<DashboardStatistics, ApiError> {
        ApiClient::dashboard_statistics(self).await
    }
}
