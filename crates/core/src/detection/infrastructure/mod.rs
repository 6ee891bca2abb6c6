pub mod opencv_face_detector;
